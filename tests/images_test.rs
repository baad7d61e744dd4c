use relist::images::extract_images;
use relist::Options;

fn gallery_page(tiles: &str) -> String {
    format!(r#"<html><body><div class="ux-image-grid no-scrollbar">{tiles}</div></body></html>"#)
}

fn tile(src: &str) -> String {
    format!(r#"<button class="ux-image-grid-item"><img src="{src}" alt=""></button>"#)
}

#[test]
fn normalizes_every_gallery_image_to_the_full_resolution_variant() {
    let tiles = [
        tile("https://i.ebayimg.com/images/g/abcAAOSw/s-l64.jpg"),
        tile("https://i.ebayimg.com/images/g/defAAOSw/s-l500.jpg"),
        tile("https://i.ebayimg.com/images/g/ghiAAOSw/s-l1600.jpg"),
    ]
    .concat();
    let set = extract_images(&gallery_page(&tiles), &Options::default());

    assert_eq!(
        set.urls(),
        &[
            "https://i.ebayimg.com/images/g/abcAAOSw/s-l1600.jpg",
            "https://i.ebayimg.com/images/g/defAAOSw/s-l1600.jpg",
            "https://i.ebayimg.com/images/g/ghiAAOSw/s-l1600.jpg",
        ]
    );
}

#[test]
fn truncates_the_gallery_to_the_image_cap() {
    let tiles: String = (1..=9)
        .map(|n| tile(&format!("https://i.ebayimg.com/images/g/item{n}/s-l500.jpg")))
        .collect();
    let set = extract_images(&gallery_page(&tiles), &Options::default());

    assert_eq!(set.len(), 6);
    assert_eq!(
        set.urls()[0],
        "https://i.ebayimg.com/images/g/item1/s-l1600.jpg"
    );
    assert_eq!(
        set.urls()[5],
        "https://i.ebayimg.com/images/g/item6/s-l1600.jpg"
    );
}

#[test]
fn image_cap_is_configurable() {
    let tiles = [
        tile("https://i.ebayimg.com/images/g/firstAAOSw/s-l500.jpg"),
        tile("https://i.ebayimg.com/images/g/secondAAOSw/s-l500.jpg"),
        tile("https://i.ebayimg.com/images/g/thirdAAOSw/s-l500.jpg"),
    ]
    .concat();
    let options = Options {
        max_images: 2,
        ..Options::default()
    };
    let set = extract_images(&gallery_page(&tiles), &options);

    assert_eq!(
        set.urls(),
        &[
            "https://i.ebayimg.com/images/g/firstAAOSw/s-l1600.jpg",
            "https://i.ebayimg.com/images/g/secondAAOSw/s-l1600.jpg",
        ]
    );
}

#[test]
fn skips_the_video_placeholder_tile() {
    let tiles = [
        tile("https://i.ebayimg.com/images/g/realAAOSw/s-l500.jpg"),
        tile("https://i.ebayimg.com/images/g/DOcAAOSw8NplLtwK/s-l500.jpg"),
        tile("https://i.ebayimg.com/images/g/otherAAOSw/s-l500.jpg"),
    ]
    .concat();
    let set = extract_images(&gallery_page(&tiles), &Options::default());

    assert_eq!(set.len(), 2);
    assert!(set
        .urls()
        .iter()
        .all(|url| !url.contains("DOcAAOSw8NplLtwK")));
}

#[test]
fn falls_back_to_data_src_for_lazy_loaded_tiles() {
    let html = gallery_page(concat!(
        r#"<button class="ux-image-grid-item"><img src="data:image/gif;base64,R0lGODlhAQABAIAAAP" data-src="https://i.ebayimg.com/images/g/lazyAAOSw/s-l960.jpg"></button>"#,
        r#"<button class="ux-image-grid-item"><img src="" data-src="https://i.ebayimg.com/images/g/blankAAOSw/s-l500.jpg"></button>"#,
    ));
    let set = extract_images(&html, &Options::default());

    assert_eq!(
        set.urls(),
        &[
            "https://i.ebayimg.com/images/g/lazyAAOSw/s-l1600.jpg",
            "https://i.ebayimg.com/images/g/blankAAOSw/s-l1600.jpg",
        ]
    );
}

#[test]
fn collapses_duplicates_without_spending_the_cap_on_them() {
    // The same photo listed at two widths plus five distinct tiles; the
    // duplicate must not push the last distinct image out.
    let mut tiles = String::new();
    tiles.push_str(&tile("https://i.ebayimg.com/images/g/dupAAOSw/s-l500.jpg"));
    tiles.push_str(&tile("https://i.ebayimg.com/images/g/dupAAOSw/s-l1600.jpg"));
    for n in 1..=5 {
        tiles.push_str(&tile(&format!(
            "https://i.ebayimg.com/images/g/uniq{n}/s-l500.jpg"
        )));
    }
    let set = extract_images(&gallery_page(&tiles), &Options::default());

    assert_eq!(set.len(), 6);
    assert_eq!(
        set.urls()[0],
        "https://i.ebayimg.com/images/g/dupAAOSw/s-l1600.jpg"
    );
    assert_eq!(
        set.urls()[5],
        "https://i.ebayimg.com/images/g/uniq5/s-l1600.jpg"
    );
}

#[test]
fn yields_an_empty_set_when_the_gallery_is_missing() {
    assert!(extract_images("", &Options::default()).is_empty());
    assert!(extract_images("   \n", &Options::default()).is_empty());

    let set = extract_images(
        "<html><body><p>No gallery on this page</p></body></html>",
        &Options::default(),
    );
    assert!(set.is_empty());
}

#[test]
fn drops_tiles_without_a_usable_source() {
    let html = gallery_page(concat!(
        r#"<button class="ux-image-grid-item"><img src=""></button>"#,
        r#"<button class="ux-image-grid-item"><img src="data:image/png;base64,iVBOR"></button>"#,
        r#"<button class="ux-image-grid-item"><img src="https://i.ebayimg.com/images/g/okAAOSw/s-l300.jpg"></button>"#,
    ));
    let set = extract_images(&html, &Options::default());

    assert_eq!(
        set.urls(),
        &["https://i.ebayimg.com/images/g/okAAOSw/s-l1600.jpg"]
    );
}
