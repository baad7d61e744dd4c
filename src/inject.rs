//! Template injection.
//!
//! Splices a [`NormalizedListing`] and its images into the fixed anchor
//! points of the storefront template. Every step is independent: when a
//! step's source data is empty or its template anchor is missing, the
//! step is skipped and the template's pre-existing content for that
//! section survives untouched. The only failure the injector raises is
//! a blank template, because there is nothing to anchor into.

use dom_query::{Document, Selection};

use crate::dom::{self, escape_attr, escape_text, unescape_html};
use crate::error::{Error, Result};
use crate::images::{thumbnail_url, ImageSet};
use crate::listing::{ContentBlock, NormalizedListing, SourceFormat, SpecSection};
use crate::patterns::{
    COMPAT_HEADING_MARKER, NOTES_STYLE_MARKER, TEMPLATE_DESCRIPTION_SELECTOR,
    TEMPLATE_GALLERY_SELECTOR, TEMPLATE_SECTION_DETAILS_SELECTOR, TEMPLATE_SECTION_SELECTOR,
    TEMPLATE_SPEC_TABLE_SELECTOR, TEMPLATE_TITLE_SELECTOR,
};

/// Static terms-of-use and warranty links restored at the top of the
/// description section whenever it is rebuilt.
const TERMS_BLOCK_HTML: &str = r##"<p class="terms-links"><a href="#terms-of-use" target="_blank">Terms of Use</a> | <a href="#warranty" target="_blank">Warranty Information</a></p>"##;

/// Compact table styling appended for every format.
const BASE_TABLE_CSS: &str = "\n.table { border-collapse: collapse; width: 100%; }\n\
    .table td, .table th { padding: 4px 8px; font-size: 13px; line-height: 1.4; }\n";

/// Zebra striping and bold key cells, applied to Carparts tables only.
const CARPARTS_TABLE_CSS: &str =
    "\n.table tr:nth-child(even) { background-color: #f2f2f2; }\n\
    .table td:nth-child(odd) { font-weight: bold; }\n";

/// Renders the final listing HTML: parses the template, runs every
/// injection step, serializes, and unescapes the entity set the
/// serializer introduced.
///
/// # Errors
///
/// Returns [`Error::EmptyTemplate`] when the template text is blank.
pub fn inject(
    template_html: &str,
    listing: &NormalizedListing,
    images: &ImageSet,
    format: SourceFormat,
) -> Result<String> {
    if template_html.trim().is_empty() {
        return Err(Error::EmptyTemplate);
    }
    let doc = dom::parse(template_html);
    inject_gallery(&doc, images);
    inject_title(&doc, listing);
    inject_description(&doc, listing);
    inject_specs(&doc, listing);
    inject_compatibility(&doc, listing);
    inject_notes(&doc, listing);
    inject_css(&doc, format);
    Ok(unescape_html(&doc.html()))
}

/// Step 1: rebuild the gallery as a CSS-only tab gallery. One radio
/// input plus one content pane per image, first image selected, then a
/// thumbnail strip of labels targeting the radio ids.
fn inject_gallery(doc: &Document, images: &ImageSet) {
    if images.is_empty() {
        return;
    }
    let gallery = doc.select(TEMPLATE_GALLERY_SELECTOR);
    if !gallery.exists() {
        return;
    }

    let mut html = String::new();
    for (index, url) in images.urls().iter().enumerate() {
        let slot = index + 1;
        let checked = if index == 0 { " checked" } else { "" };
        html.push_str(&format!(
            r#"<input type="radio" name="gal" id="gal{slot}"{checked}>"#
        ));
        html.push_str(&format!(
            r#"<div class="product-image-container" id="content{slot}"><img src="{}" alt="Image {slot}"></div>"#,
            escape_attr(url)
        ));
    }
    html.push_str(r#"<div class="thumbnails-box">"#);
    for (index, url) in images.urls().iter().enumerate() {
        let slot = index + 1;
        html.push_str(&format!(
            r#"<label class="thumb-label" for="gal{slot}"><img class="thumb" src="{}" alt="Thumb {slot}"></label>"#,
            escape_attr(&thumbnail_url(url))
        ));
    }
    html.push_str("</div>");
    gallery.set_html(html.as_str());
}

/// Step 2: replace the title heading text.
fn inject_title(doc: &Document, listing: &NormalizedListing) {
    let Some(title_text) = listing.title.as_deref() else {
        return;
    };
    let title = doc.select(TEMPLATE_TITLE_SELECTOR);
    if !title.exists() {
        return;
    }
    dom::set_text(&title.first(), title_text);
}

/// Step 3: rebuild the description container: the static terms block
/// first, then every content block in order.
fn inject_description(doc: &Document, listing: &NormalizedListing) {
    if listing.description.is_empty() {
        return;
    }
    let container = doc.select(TEMPLATE_DESCRIPTION_SELECTOR);
    if !container.exists() {
        return;
    }
    let mut html = String::from(TERMS_BLOCK_HTML);
    for block in &listing.description {
        html.push_str(&render_block(block));
    }
    container.set_html(html.as_str());
}

/// Step 4: refill the specification table, writing into its `tbody`
/// when the template has one and the bare table otherwise.
fn inject_specs(doc: &Document, listing: &NormalizedListing) {
    if listing.specs.is_empty() {
        return;
    }
    let table = doc.select(TEMPLATE_SPEC_TABLE_SELECTOR);
    if !table.exists() {
        return;
    }
    let tbody = table.select("tbody");
    let target = if tbody.exists() { tbody } else { table };

    let mut html = String::new();
    match &listing.specs {
        SpecSection::Rows(rows) => {
            for row in rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", escape_text(cell)));
                }
                html.push_str("</tr>");
            }
        }
        SpecSection::Pairs(pairs) => {
            for row in pairs.rows() {
                html.push_str(&format!(
                    "<tr><td><b>{}</b></td><td>{}</td></tr>",
                    escape_text(&row.key),
                    escape_text(&row.value)
                ));
            }
        }
    }
    target.set_html(html.as_str());
}

/// Step 5: find the template section whose `h4` carries the
/// compatibility marker and replace its details with a fresh inner div
/// of brand paragraphs and item lists.
fn inject_compatibility(doc: &Document, listing: &NormalizedListing) {
    if listing.compatibility.is_empty() {
        return;
    }
    for section in doc.select(TEMPLATE_SECTION_SELECTOR).nodes() {
        let section_sel = Selection::from(*section);
        let is_target = section_sel
            .select("h4")
            .nodes()
            .iter()
            .any(|h4| dom::node_collapsed_text(h4).contains(COMPAT_HEADING_MARKER));
        if !is_target {
            continue;
        }
        let details = section_sel.select(TEMPLATE_SECTION_DETAILS_SELECTOR);
        if !details.exists() {
            continue;
        }

        let mut html = String::from("<div>");
        for group in &listing.compatibility {
            if let Some(brand) = &group.brand {
                html.push_str(&format!("<p><strong>{}</strong></p>", escape_text(brand)));
            }
            if !group.items.is_empty() {
                html.push_str("<ul>");
                for item in &group.items {
                    html.push_str(&format!("<li>{}</li>", escape_text(item)));
                }
                html.push_str("</ul>");
            }
        }
        html.push_str("</div>");
        details.set_html(html.as_str());
        return;
    }
}

/// Step 6: append one paragraph per note to the section identified by
/// the notes style marker.
fn inject_notes(doc: &Document, listing: &NormalizedListing) {
    if listing.notes.is_empty() {
        return;
    }
    let selector = format!(r#"[style*="{NOTES_STYLE_MARKER}"]"#);
    let section = doc.select(selector.as_str());
    if !section.exists() {
        return;
    }
    let mut html = String::new();
    for note in &listing.notes {
        html.push_str(&format!("<p>{}</p>", escape_text(note)));
    }
    section.first().append_html(html.as_str());
}

/// Step 7: append format-conditional CSS to the template's style block.
fn inject_css(doc: &Document, format: SourceFormat) {
    let style = doc.select("style");
    if !style.exists() {
        return;
    }
    let target = style.first();
    target.append_html(BASE_TABLE_CSS);
    if format == SourceFormat::Carparts {
        target.append_html(CARPARTS_TABLE_CSS);
    }
}

/// Renders one content block as description markup.
fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Heading(text) => format!("<h3>{}</h3>", escape_text(text)),
        ContentBlock::Paragraph { text, emphasized } => {
            if *emphasized {
                format!("<p><b>{}</b></p>", escape_text(text))
            } else {
                format!("<p>{}</p>", escape_text(text))
            }
        }
        ContentBlock::List(items) => {
            let mut html = String::from("<ul>");
            for item in items {
                html.push_str(&format!("<li>{}</li>", escape_text(item)));
            }
            html.push_str("</ul>");
            html
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_template_is_rejected() {
        let listing = NormalizedListing::default();
        let images = ImageSet::new();
        match inject("   \n", &listing, &images, SourceFormat::Xtreme) {
            Err(Error::EmptyTemplate) => {}
            other => panic!("expected EmptyTemplate, got {other:?}"),
        }
    }

    #[test]
    fn test_render_block_variants() {
        assert_eq!(
            render_block(&ContentBlock::Heading("Fitment".to_string())),
            "<h3>Fitment</h3>"
        );
        assert_eq!(
            render_block(&ContentBlock::Paragraph {
                text: "Plain".to_string(),
                emphasized: false,
            }),
            "<p>Plain</p>"
        );
        assert_eq!(
            render_block(&ContentBlock::Paragraph {
                text: "Lead".to_string(),
                emphasized: true,
            }),
            "<p><b>Lead</b></p>"
        );
        assert_eq!(
            render_block(&ContentBlock::List(vec!["a".to_string(), "b".to_string()])),
            "<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_render_block_escapes_markup() {
        let rendered = render_block(&ContentBlock::Paragraph {
            text: "5 < 6 & 7 > 2".to_string(),
            emphasized: false,
        });
        assert_eq!(rendered, "<p>5 &lt; 6 &amp; 7 &gt; 2</p>");
    }
}
