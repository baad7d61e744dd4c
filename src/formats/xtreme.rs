//! Grammar for the "Xtreme" storefront layout.
//!
//! Xtreme pages wrap the description in a `div.desc-box` whose markup is
//! machine-generated and heavily nested, so the walk covers every
//! descendant rather than trusting the top-level structure. Headings are
//! recognized three ways: a bare `h3`, an `h3` buried inside a wrapper
//! (promoted out of it), or any short span-free run of text. A page is
//! allowed at most one real heading; later candidates render as bold
//! paragraphs so the output never carries competing section titles.

use std::collections::HashSet;

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::listing::{CompatibilityGroup, ContentBlock, SourceFormat, SpecSection};
use crate::options::Options;
use crate::patterns::{FONT_SIZE_PX, OPACITY_ZERO, WHITE_COLOR};

use super::{flush_group, list_items, table_cell_rows, FormatGrammar};

/// Grammar for Xtreme description documents.
pub struct Xtreme;

impl FormatGrammar for Xtreme {
    fn format(&self) -> SourceFormat {
        SourceFormat::Xtreme
    }

    fn extract_title(&self, doc: &Document) -> Option<String> {
        let heading = doc.select(".title-name h2");
        if !heading.exists() {
            return None;
        }
        let title = dom::collapsed_text(&heading.first());
        (!title.is_empty()).then_some(title)
    }

    fn clean_description(&self, doc: &Document, options: &Options) -> Vec<ContentBlock> {
        let region = doc.select("div.desc-box");
        let Some(root) = region.nodes().first().copied() else {
            return Vec::new();
        };
        strip_invisible_spans(&Selection::from(root));

        let mut blocks = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut heading_emitted = false;

        for node in root.descendants() {
            if !node.is_element() {
                continue;
            }
            let tag = dom::node_tag(&node);
            if !matches!(tag.as_str(), "h3" | "p" | "span" | "div") {
                continue;
            }
            let text = dom::node_collapsed_text(&node);
            if text.is_empty() || !seen.insert(text.clone()) {
                continue;
            }

            let sel = Selection::from(node);
            if tag == "h3" && !dom::has_descendant(&sel, "span") {
                emit_heading_candidate(&mut blocks, &mut heading_emitted, text);
                continue;
            }
            if tag != "h3" {
                let inner = sel.select("h3");
                if inner.exists() {
                    // A wrapper around a heading: promote the inner
                    // heading text, consume the wrapper without emitting
                    // its flattened text. A wrapper holding nothing but
                    // the heading collapses to the same text, which the
                    // walk already marked seen for this very node.
                    let inner_text = dom::collapsed_text(&inner.first());
                    if !inner_text.is_empty()
                        && (inner_text == text || seen.insert(inner_text.clone()))
                    {
                        emit_heading_candidate(&mut blocks, &mut heading_emitted, inner_text);
                    }
                    continue;
                }
            }
            if text.chars().count() < options.heading_max_chars
                && !dom::has_descendant(&sel, "span")
            {
                emit_heading_candidate(&mut blocks, &mut heading_emitted, text);
                continue;
            }
            blocks.push(ContentBlock::Paragraph {
                text,
                emphasized: false,
            });
        }
        blocks
    }

    fn extract_specs(&self, doc: &Document, _options: &Options) -> SpecSection {
        let tables = doc.select(".tableinfo table");
        if !tables.exists() {
            return SpecSection::default();
        }
        let rows = table_cell_rows(&tables.first());
        if rows.is_empty() {
            SpecSection::default()
        } else {
            SpecSection::Rows(rows)
        }
    }

    fn extract_compatibility(
        &self,
        doc: &Document,
        options: &Options,
    ) -> Vec<CompatibilityGroup> {
        // Pages carry several table-details blocks; the compatibility
        // listing is always the last one.
        let regions = doc.select("div.table-details");
        let Some(region) = regions.nodes().last().copied() else {
            return Vec::new();
        };

        let mut groups = Vec::new();
        let mut brand: Option<String> = None;
        let mut items: Vec<String> = Vec::new();

        for child in Selection::from(region).children().nodes() {
            let text = dom::node_collapsed_text(child);
            if text.is_empty() {
                continue;
            }
            let tag = dom::node_tag(child);
            let sel = Selection::from(*child);
            if tag == "ul" || tag == "ol" {
                items.extend(list_items(&sel));
                continue;
            }
            if let Some(name) = brand_header_text(&sel, &tag, &text, options) {
                flush_group(&mut groups, &mut brand, &mut items);
                brand = Some(name);
                continue;
            }
            items.push(text);
        }
        flush_group(&mut groups, &mut brand, &mut items);
        groups
    }
}

/// Emits a heading candidate: the first one becomes the section heading,
/// every later one degrades to a bold paragraph.
fn emit_heading_candidate(blocks: &mut Vec<ContentBlock>, heading_emitted: &mut bool, text: String) {
    if *heading_emitted {
        blocks.push(ContentBlock::Paragraph {
            text,
            emphasized: true,
        });
    } else {
        blocks.push(ContentBlock::Heading(text));
        *heading_emitted = true;
    }
}

/// Removes spans styled to be invisible (zero opacity, sub-pixel font,
/// white-on-white). Storefronts hide tracking codes and watermarks this
/// way and their text must not leak into the cleaned description.
fn strip_invisible_spans(region: &Selection) {
    let mut doomed: Vec<NodeRef> = Vec::new();
    for node in region.select("span[style]").nodes() {
        let style = dom::node_style(node);
        if is_invisible_style(&style) {
            doomed.push(*node);
        }
    }
    for node in doomed.iter().rev() {
        Selection::from(*node).remove();
    }
}

fn is_invisible_style(style: &str) -> bool {
    if OPACITY_ZERO.is_match(style) || WHITE_COLOR.is_match(style) {
        return true;
    }
    if let Some(caps) = FONT_SIZE_PX.captures(style) {
        if let Some(size) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
            return size < 1.0;
        }
    }
    false
}

/// Classifies a direct child of the compatibility region as a brand
/// header, returning the brand name when it is one. Brand rows are a
/// leaf `h6`, a `p` wrapping a `strong` run (the run is the brand), a
/// `div` with the storefront's font/span/b markup sandwich, or simply a
/// very short line of text.
fn brand_header_text(
    sel: &Selection,
    tag: &str,
    text: &str,
    options: &Options,
) -> Option<String> {
    if tag == "h6" && sel.children().is_empty() {
        return Some(text.to_string());
    }
    if tag == "p" {
        let strong = sel.select("strong");
        if strong.exists() {
            let name = dom::collapsed_text(&strong.first());
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    if tag == "div"
        && dom::has_descendant(sel, "font")
        && dom::has_descendant(sel, "span")
        && dom::has_descendant(sel, "b")
    {
        return Some(text.to_string());
    }
    (text.chars().count() < options.brand_max_chars).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::extract_listing;

    fn blocks_for(html: &str) -> Vec<ContentBlock> {
        let doc = Document::from(html);
        Xtreme.clean_description(&doc, &Options::default())
    }

    #[test]
    fn test_first_candidate_is_heading_second_degrades() {
        let blocks = blocks_for(
            r#"<div class="desc-box">
                <h3>Premium Floor Liner</h3>
                <p>Custom molded to hug every contour of the factory floor pan for a precise fit that will not shift underfoot.</p>
                <h3>Easy Installation</h3>
            </div>"#,
        );
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            ContentBlock::Heading("Premium Floor Liner".to_string())
        );
        match &blocks[2] {
            ContentBlock::Paragraph { text, emphasized } => {
                assert_eq!(text, "Easy Installation");
                assert!(emphasized);
            }
            other => panic!("expected emphasized paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_short_span_free_text_promotes_to_heading() {
        let blocks = blocks_for(
            r#"<div class="desc-box">
                <div>Key Features</div>
                <p>Manufactured from a flexible thermoplastic blend that stays pliable in freezing temperatures and resists cracking.</p>
            </div>"#,
        );
        assert_eq!(blocks[0], ContentBlock::Heading("Key Features".to_string()));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_short_text_with_span_stays_paragraph() {
        let blocks = blocks_for(
            r#"<div class="desc-box"><p>Short <span>note</span></p></div>"#,
        );
        match &blocks[0] {
            ContentBlock::Paragraph { text, emphasized } => {
                assert_eq!(text, "Short note");
                assert!(!emphasized);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_heading_promoted_out_of_wrapper() {
        let blocks = blocks_for(
            r#"<div class="desc-box">
                <div><h3>Fitment Guide</h3></div>
                <p>Refer to the compatibility chart below before ordering to confirm this liner matches your cab configuration.</p>
            </div>"#,
        );
        assert_eq!(blocks[0], ContentBlock::Heading("Fitment Guide".to_string()));
        // The wrapper's flattened text is consumed, not emitted.
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_repeated_text_emitted_once() {
        let blocks = blocks_for(
            r#"<div class="desc-box">
                <p>Backed by a three year manufacturer warranty covering cracking, fading and material defects under normal use.</p>
                <div><p>Backed by a three year manufacturer warranty covering cracking, fading and material defects under normal use.</p></div>
            </div>"#,
        );
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_invisible_spans_stripped_before_walk() {
        let blocks = blocks_for(
            r#"<div class="desc-box">
                <p>Genuine replacement part<span style="opacity: 0;">seller-code-991</span></p>
                <p style="margin:0">Ships from our warehouse within one business day of cleared payment, carefully boxed.</p>
                <span style="font-size: 0.5px">watermark</span>
                <span style="color: #ffffff">hidden text</span>
            </div>"#,
        );
        let joined = blocks
            .iter()
            .map(|b| format!("{b:?}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(!joined.contains("seller-code-991"));
        assert!(!joined.contains("watermark"));
        assert!(!joined.contains("hidden text"));
        assert!(joined.contains("Genuine replacement part"));
    }

    #[test]
    fn test_missing_region_yields_empty() {
        assert!(blocks_for("<div><p>No description box here.</p></div>").is_empty());
    }

    #[test]
    fn test_spec_table_rows_copied_with_empty_cells() {
        let doc = Document::from(
            r#"<div class="tableinfo"><table>
                <tr><td>Material</td><td>TPE rubber</td></tr>
                <tr><td>Color</td><td></td></tr>
            </table></div>"#,
        );
        match Xtreme.extract_specs(&doc, &Options::default()) {
            SpecSection::Rows(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0], vec!["Material", "TPE rubber"]);
                assert_eq!(rows[1], vec!["Color", ""]);
            }
            SpecSection::Pairs(_) => panic!("expected verbatim rows"),
        }
    }

    #[test]
    fn test_compatibility_groups_split_on_brand_headers() {
        let doc = Document::from(
            r#"<div class="table-details"><p>old block</p></div>
            <div class="table-details">
                <h6>Ford</h6>
                <ul><li>F-150 2015-2020 SuperCrew Cab</li><li>F-250 2017-2022 Crew Cab</li></ul>
                <h6>Toyota</h6>
                <ul><li>Tundra 2014-2021 Double Cab</li></ul>
            </div>"#,
        );
        let groups = Xtreme.extract_compatibility(&doc, &Options::default());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].brand.as_deref(), Some("Ford"));
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].brand.as_deref(), Some("Toyota"));
        assert_eq!(groups[1].items, vec!["Tundra 2014-2021 Double Cab"]);
    }

    #[test]
    fn test_paragraph_with_strong_run_starts_group_named_by_run() {
        let doc = Document::from(
            r#"<div class="table-details">
                <p><strong>Ram</strong> trucks listed below</p>
                <ul><li>1500 2019-2024 Quad Cab</li></ul>
            </div>"#,
        );
        let groups = Xtreme.extract_compatibility(&doc, &Options::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].brand.as_deref(), Some("Ram"));
        assert_eq!(groups[0].items, vec!["1500 2019-2024 Quad Cab"]);
    }

    #[test]
    fn test_items_before_first_brand_get_anonymous_group() {
        let doc = Document::from(
            r#"<div class="table-details">
                <p>Fits the following vehicles with standard floor anchors only.</p>
                <h6>Chevrolet</h6>
                <ul><li>Silverado 1500 2019-2023</li></ul>
            </div>"#,
        );
        let groups = Xtreme.extract_compatibility(&doc, &Options::default());
        assert_eq!(groups.len(), 2);
        assert!(groups[0].brand.is_none());
        assert_eq!(groups[0].items.len(), 1);
        assert_eq!(groups[1].brand.as_deref(), Some("Chevrolet"));
    }

    #[test]
    fn test_extract_listing_assembles_all_sections() {
        let doc = Document::from(
            r#"<div class="title-name"><h2>WeatherTough Floor Liner Set</h2></div>
            <div class="desc-box"><h3>Premium Floor Liner</h3></div>
            <div class="tableinfo"><table><tr><td>Material</td><td>TPE</td></tr></table></div>
            <div class="table-details"><h6>Ford</h6><ul><li>F-150 2015-2020</li></ul></div>"#,
        );
        let listing = extract_listing(SourceFormat::Xtreme, &doc, &Options::default());
        assert_eq!(listing.title.as_deref(), Some("WeatherTough Floor Liner Set"));
        assert_eq!(listing.description.len(), 1);
        assert!(!listing.specs.is_empty());
        assert_eq!(listing.compatibility.len(), 1);
        assert!(listing.notes.is_empty());
    }
}
