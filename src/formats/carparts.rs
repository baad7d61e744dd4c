//! Grammar for the "Carparts" storefront layout.
//!
//! Carparts descriptions live inside a `#ds_div` wrapper and open with a
//! literal "Description" heading; everything after that heading, sibling
//! by sibling, is the content. The markup nests blocks inside anonymous
//! `div` wrappers, so container elements are unpacked depth-first rather
//! than flattened. Text passes through mojibake repair because these
//! pages are routinely double-encoded upstream. The walk ends at the
//! first sectioning element, which the storefront uses to open its
//! shipping and returns boilerplate.

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::encoding::repair_mojibake;
use crate::listing::{CompatibilityGroup, ContentBlock, SourceFormat, SpecSection};
use crate::options::Options;
use crate::patterns::BOLD_WEIGHT;

use super::{
    anchor_by_text, flush_group, following_siblings, list_items, table_cell_rows,
    BlockCollector, FormatGrammar,
};

/// Stock photo disclaimer the storefront appends to every listing.
const DISCLAIMER_MARKER: &str = "All pictures are for illustration purposes only";

/// Grammar for Carparts description documents.
pub struct Carparts;

impl FormatGrammar for Carparts {
    fn format(&self) -> SourceFormat {
        SourceFormat::Carparts
    }

    fn extract_title(&self, doc: &Document) -> Option<String> {
        let heading = doc.select("h1");
        if !heading.exists() {
            return None;
        }
        let title = repair_mojibake(&dom::collapsed_text(&heading.first()));
        (!title.is_empty()).then_some(title)
    }

    fn clean_description(&self, doc: &Document, options: &Options) -> Vec<ContentBlock> {
        let region = content_region(doc);
        let Some(anchor) = anchor_by_text(&region, "Description") else {
            return Vec::new();
        };

        let mut collector = BlockCollector::new();
        for node in following_siblings(&anchor) {
            if !node.is_element() {
                continue;
            }
            if is_sectioning(&dom::node_tag(&node)) {
                break;
            }
            collect_node(&Selection::from(node), &mut collector);
        }

        let mut blocks = collector.into_blocks();
        mark_list_intros(&mut blocks, options);
        blocks
    }

    fn extract_specs(&self, doc: &Document, _options: &Options) -> SpecSection {
        let region = content_region(doc);
        let tables = region.select("table");
        if !tables.exists() {
            return SpecSection::default();
        }
        let rows: Vec<Vec<String>> = table_cell_rows(&tables.first())
            .into_iter()
            .map(|row| row.iter().map(|cell| repair_mojibake(cell)).collect())
            .collect();
        if rows.is_empty() {
            return SpecSection::default();
        }
        if rows.iter().all(|row| row.len() == 2) {
            SpecSection::Rows(repair_into_four_columns(rows))
        } else {
            SpecSection::Rows(rows)
        }
    }

    fn extract_compatibility(
        &self,
        doc: &Document,
        _options: &Options,
    ) -> Vec<CompatibilityGroup> {
        let region = content_region(doc);
        let anchor = anchor_by_text(&region, "Fitment")
            .or_else(|| anchor_by_text(&region, "Compatibility"));
        let Some(anchor) = anchor else {
            return Vec::new();
        };

        let mut groups = Vec::new();
        let mut brand: Option<String> = None;
        let mut items: Vec<String> = Vec::new();

        for node in following_siblings(&anchor) {
            if !node.is_element() {
                continue;
            }
            let tag = dom::node_tag(&node);
            if is_sectioning(&tag) {
                break;
            }
            let sel = Selection::from(node);
            if tag == "ul" || tag == "ol" {
                items.extend(list_items(&sel).iter().map(|item| repair_mojibake(item)));
                continue;
            }
            let raw = dom::node_collapsed_text(&node);
            if raw.is_empty() {
                continue;
            }
            if matches!(tag.as_str(), "h5" | "h6") || is_fully_bold(&sel, &raw) {
                flush_group(&mut groups, &mut brand, &mut items);
                brand = Some(repair_mojibake(&raw));
                continue;
            }
            items.push(repair_mojibake(&raw));
        }
        flush_group(&mut groups, &mut brand, &mut items);
        groups
    }
}

/// The description wrapper, falling back to the whole body on pages
/// that inline the description without it.
fn content_region(doc: &Document) -> Selection {
    let region = doc.select("#ds_div");
    if region.exists() {
        region
    } else {
        doc.select("body")
    }
}

fn is_sectioning(tag: &str) -> bool {
    matches!(tag, "section" | "article" | "aside" | "nav" | "footer")
}

/// Classifies one walked element into blocks, recursing through `div`
/// wrappers that hold further block structure.
fn collect_node(sel: &Selection, collector: &mut BlockCollector) {
    let tag = dom::tag_name(sel).unwrap_or_default();
    match tag.as_str() {
        "ul" | "ol" => {
            let items: Vec<String> = list_items(sel)
                .iter()
                .map(|item| repair_mojibake(item))
                .collect();
            if !items.is_empty() {
                collector.push(ContentBlock::List(items));
            }
        }
        "div" => {
            if has_block_children(sel) {
                for child in child_elements(sel) {
                    collect_node(&Selection::from(child), collector);
                }
            } else {
                push_text_block(sel, collector);
            }
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let text = repair_mojibake(&dom::collapsed_text(sel));
            if !text.is_empty() && !text.contains(DISCLAIMER_MARKER) {
                collector.push(ContentBlock::Heading(text));
            }
        }
        "script" | "style" | "table" => {}
        _ => push_text_block(sel, collector),
    }
}

/// Emits the element's text as a paragraph, or as a heading when the
/// whole text is a single bolded run.
fn push_text_block(sel: &Selection, collector: &mut BlockCollector) {
    let raw = dom::collapsed_text(sel);
    if raw.is_empty() {
        return;
    }
    let text = repair_mojibake(&raw);
    if text.contains(DISCLAIMER_MARKER) {
        return;
    }
    if is_fully_bold(sel, &raw) {
        collector.push(ContentBlock::Heading(text));
    } else {
        collector.push(ContentBlock::Paragraph {
            text,
            emphasized: false,
        });
    }
}

/// Whether the element renders its entire text bold, either through an
/// inline style or a `b`/`strong` run covering all of it.
fn is_fully_bold(sel: &Selection, raw_text: &str) -> bool {
    if dom::get_attribute(sel, "style").is_some_and(|style| BOLD_WEIGHT.is_match(&style)) {
        return true;
    }
    sel.select("b, strong")
        .nodes()
        .iter()
        .any(|node| dom::node_collapsed_text(node) == raw_text)
}

fn has_block_children(sel: &Selection) -> bool {
    child_elements(sel).iter().any(|child| {
        matches!(
            dom::node_tag(child).as_str(),
            "div" | "p" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "table"
        )
    })
}

fn child_elements<'a>(sel: &Selection<'a>) -> Vec<NodeRef<'a>> {
    sel.children().nodes().to_vec()
}

/// Short paragraphs that sit directly above a list introduce it; they
/// are rendered emphasized so the intro reads as a lead-in line.
fn mark_list_intros(blocks: &mut [ContentBlock], options: &Options) {
    for i in 0..blocks.len().saturating_sub(1) {
        if !matches!(blocks[i + 1], ContentBlock::List(_)) {
            continue;
        }
        if let ContentBlock::Paragraph { text, emphasized } = &mut blocks[i] {
            if !*emphasized && text.chars().count() < options.intro_max_chars {
                *emphasized = true;
            }
        }
    }
}

/// Folds a two-column key/value table into four-column rows, two pairs
/// per row, padding the final row when the pair count is odd.
fn repair_into_four_columns(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let pairs: Vec<(String, String)> = rows
        .into_iter()
        .map(|mut row| {
            let value = row.pop().unwrap_or_default();
            let key = row.pop().unwrap_or_default();
            (key, value)
        })
        .collect();

    let mut out = Vec::with_capacity(pairs.len().div_ceil(2));
    for chunk in pairs.chunks(2) {
        let mut row = Vec::with_capacity(4);
        for (key, value) in chunk {
            row.push(key.clone());
            row.push(value.clone());
        }
        while row.len() < 4 {
            row.push(String::new());
        }
        out.push(row);
    }
    out
}
