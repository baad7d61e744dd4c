use relist::{extract_listing, ContentBlock, Options, SourceFormat, SpecSection};

const LISTING_HTML: &str = r#"<html><body>
<div class="title-name"><h2>All Weather Floor Liner Set</h2></div>
<div class="desc-box">
    <h3>Custom Fit Protection</h3>
    <p>Laser measured liners hug every contour of the footwell and lock in place over the factory anchor points.</p>
    <span style="opacity: 0">floor mats liner liners all weather rubber carpet</span>
    <div><h3>Easy To Clean</h3></div>
    <p>Rinse with a hose and the raised channels drain away mud, road salt and spilled coffee in seconds.</p>
</div>
<div class="tableinfo">
    <table>
        <tr><td>Material</td><td>TPE rubber</td></tr>
        <tr><td>Rows Covered</td><td>Front and rear</td></tr>
        <tr><td>Color</td><td>Black</td></tr>
    </table>
</div>
<div class="table-details">
    <h6>Old Catalog</h6>
    <ul><li>Legacy Wagon 1999-2003</li></ul>
</div>
<div class="table-details">
    <h6>Ford</h6>
    <ul>
        <li>F-150 2015-2020 SuperCrew</li>
        <li>F-250 2017-2022 Crew Cab</li>
    </ul>
    <h6>Toyota</h6>
    <ul><li>Tundra 2014-2021 Double Cab</li></ul>
</div>
</body></html>"#;

#[test]
fn extracts_title_description_specs_and_compatibility() {
    let listing = extract_listing(SourceFormat::Xtreme, LISTING_HTML, &Options::default());

    assert_eq!(listing.title.as_deref(), Some("All Weather Floor Liner Set"));

    assert_eq!(listing.description.len(), 4);
    assert_eq!(
        listing.description[0],
        ContentBlock::Heading("Custom Fit Protection".to_string())
    );
    match &listing.description[2] {
        ContentBlock::Paragraph { text, emphasized } => {
            assert_eq!(text, "Easy To Clean");
            assert!(*emphasized, "later heading should degrade to bold text");
        }
        other => panic!("expected an emphasized paragraph, got {other:?}"),
    }

    match &listing.specs {
        SpecSection::Rows(rows) => {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0], ["Material", "TPE rubber"]);
        }
        SpecSection::Pairs(_) => panic!("expected raw table rows"),
    }

    assert_eq!(listing.compatibility.len(), 2);
    assert_eq!(listing.compatibility[0].brand.as_deref(), Some("Ford"));
    assert_eq!(
        listing.compatibility[0].items,
        ["F-150 2015-2020 SuperCrew", "F-250 2017-2022 Crew Cab"]
    );
    assert_eq!(listing.compatibility[1].brand.as_deref(), Some("Toyota"));
    assert_eq!(listing.compatibility[1].items, ["Tundra 2014-2021 Double Cab"]);
}

#[test]
fn hidden_keyword_spam_never_reaches_the_description() {
    let listing = extract_listing(SourceFormat::Xtreme, LISTING_HTML, &Options::default());

    for block in &listing.description {
        match block {
            ContentBlock::Heading(text) | ContentBlock::Paragraph { text, .. } => {
                assert!(
                    !text.contains("floor mats liner liners"),
                    "hidden span leaked: {text}"
                );
            }
            ContentBlock::List(items) => {
                assert!(items.iter().all(|item| !item.contains("floor mats")));
            }
        }
    }
}

#[test]
fn only_the_last_vehicle_table_is_read() {
    let listing = extract_listing(SourceFormat::Xtreme, LISTING_HTML, &Options::default());

    for group in &listing.compatibility {
        assert_ne!(group.brand.as_deref(), Some("Old Catalog"));
        assert!(group.items.iter().all(|item| !item.contains("Legacy Wagon")));
    }
}

#[test]
fn empty_page_yields_an_empty_listing() {
    let listing = extract_listing(
        SourceFormat::Xtreme,
        "<html><body></body></html>",
        &Options::default(),
    );
    assert!(listing.is_empty());
}

#[test]
fn short_paragraph_promotion_follows_the_heading_length_limit() {
    const PROMO_HTML: &str = r#"<html><body><div class="desc-box">
        <h3>Bed Mat Overview</h3>
        <p>Fits Most Truck Beds</p>
    </div></body></html>"#;

    let listing = extract_listing(SourceFormat::Xtreme, PROMO_HTML, &Options::default());
    match &listing.description[1] {
        ContentBlock::Paragraph { text, emphasized } => {
            assert_eq!(text, "Fits Most Truck Beds");
            assert!(*emphasized);
        }
        other => panic!("expected an emphasized paragraph, got {other:?}"),
    }

    let tight = Options {
        heading_max_chars: 10,
        ..Options::default()
    };
    let listing = extract_listing(SourceFormat::Xtreme, PROMO_HTML, &tight);
    match &listing.description[1] {
        ContentBlock::Paragraph { emphasized, .. } => {
            assert!(!*emphasized, "line over the limit should stay plain");
        }
        other => panic!("expected a plain paragraph, got {other:?}"),
    }
}
