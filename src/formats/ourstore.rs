//! Grammar for the "Our Store" storefront layout.
//!
//! Our Store pages are flat paragraph soup: no wrapper ids, no semantic
//! headings, every visual cue painted with inline styles. The walk
//! anchors on the "Item Description" label (older pages use a bare
//! "Description") and collects sibling text until one of the fixed
//! section markers appears. Heading classification is pure style
//! inspection; tag names mean nothing in this layout. Lines opening with
//! a note prefix are routed to the listing's notes instead of the
//! description, and the spec extractor must always publish the
//! California Proposition 65 disclosure, synthesizing the stock wording
//! when the page carries none.

use dom_query::{Document, Selection};

use crate::dom;
use crate::listing::{CompatibilityGroup, ContentBlock, SourceFormat, SpecSection, SpecTable};
use crate::options::Options;
use crate::patterns::{
    COMPAT_HEADING_MARKER, NOTE_PREFIXES, PROP65_FALLBACK, PROP65_KEY, PROP65_URL_MARKER,
    SPEC_KEY_ALLOWLIST, SPEC_LINE, SPEC_LIST_LABELS, STOP_MARKERS,
};

use super::{
    anchor_by_text, flush_group, following_siblings, list_items, style_marks_heading,
    BlockCollector, FormatGrammar,
};

/// Markers that end the compatibility walk. The description stop list
/// does not apply there since compatibility is itself one of its
/// sections.
const COMPAT_STOPS: &[&str] = &[
    "Proposition 65",
    "P65Warnings.ca.gov",
    "Specification",
    "Technical Details",
];

/// Grammar for Our Store description documents.
pub struct OurStore;

impl FormatGrammar for OurStore {
    fn format(&self) -> SourceFormat {
        SourceFormat::OurStore
    }

    fn extract_title(&self, doc: &Document) -> Option<String> {
        let heading = doc.select("h1");
        if !heading.exists() {
            return None;
        }
        let title = dom::collapsed_text(&heading.first());
        (!title.is_empty()).then_some(title)
    }

    fn clean_description(&self, doc: &Document, options: &Options) -> Vec<ContentBlock> {
        walk_description(doc, options).0
    }

    fn extract_notes(&self, doc: &Document, options: &Options) -> Vec<String> {
        walk_description(doc, options).1
    }

    fn extract_specs(&self, doc: &Document, _options: &Options) -> SpecSection {
        let mut table = SpecTable::new();
        let body = doc.select("body");

        // Pass 1: a labeled line followed directly by a list collapses
        // into one comma-joined attribute value.
        for (label, key) in SPEC_LIST_LABELS {
            let Some(anchor) = anchor_by_text(&body, label) else {
                continue;
            };
            let Some(next) = dom::next_element_sibling(&anchor) else {
                continue;
            };
            if matches!(dom::tag_name(&next).as_deref(), Some("ul" | "ol")) {
                let items = list_items(&next);
                if !items.is_empty() {
                    table.insert(*key, items.join(", "));
                }
            }
        }

        // Pass 2: colon-delimited lines, filtered through the key
        // allow-list; the Proposition 65 line is special-cased by its
        // URL marker.
        if let Some(root) = body.nodes().first().copied() {
            for node in root.descendants() {
                if !node.is_element() {
                    continue;
                }
                let tag = dom::node_tag(&node);
                if !matches!(
                    tag.as_str(),
                    "p" | "span" | "div" | "li" | "font" | "b" | "td"
                ) {
                    continue;
                }
                let sel = Selection::from(node);
                if !is_text_line(&sel) {
                    continue;
                }
                let text = dom::node_collapsed_text(&node);
                if text.is_empty() {
                    continue;
                }
                if text.contains(PROP65_URL_MARKER) {
                    table.insert(PROP65_KEY, strip_warning_header(&text));
                    continue;
                }
                let Some(caps) = SPEC_LINE.captures(&text) else {
                    continue;
                };
                let (Some(raw_key), Some(value)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let raw_key = raw_key.as_str().trim();
                if let Some(canonical) = SPEC_KEY_ALLOWLIST
                    .iter()
                    .copied()
                    .find(|key| key.eq_ignore_ascii_case(raw_key))
                {
                    table.insert(canonical, value.as_str().trim());
                }
            }
        }

        // The disclosure key is guaranteed, synthesized when absent.
        if !table.contains_key(PROP65_KEY) {
            table.insert(PROP65_KEY, PROP65_FALLBACK);
        }
        SpecSection::Pairs(table)
    }

    fn extract_compatibility(
        &self,
        doc: &Document,
        options: &Options,
    ) -> Vec<CompatibilityGroup> {
        let body = doc.select("body");
        let anchor = anchor_by_text(&body, COMPAT_HEADING_MARKER)
            .or_else(|| anchor_by_text(&body, "Compatibility"))
            .or_else(|| anchor_by_text(&body, "Fitment"));
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
            let text = dom::node_collapsed_text(&node);
            if text.is_empty() {
                continue;
            }
            if COMPAT_STOPS.iter().any(|marker| text.contains(marker)) {
                break;
            }
            let sel = Selection::from(node);
            if matches!(dom::node_tag(&node).as_str(), "ul" | "ol") {
                items.extend(list_items(&sel));
                continue;
            }
            if node_marks_heading(&sel, &text, options) {
                flush_group(&mut groups, &mut brand, &mut items);
                brand = Some(text);
                continue;
            }
            items.push(text);
        }
        flush_group(&mut groups, &mut brand, &mut items);
        groups
    }
}

/// Shared walk for description blocks and notes. One traversal feeds
/// both so the diversion rule always agrees with the block output.
fn walk_description(doc: &Document, options: &Options) -> (Vec<ContentBlock>, Vec<String>) {
    let body = doc.select("body");
    let anchor = anchor_by_text(&body, "Item Description")
        .or_else(|| anchor_by_text(&body, "Description"));
    let Some(anchor) = anchor else {
        return (Vec::new(), Vec::new());
    };

    let mut collector = BlockCollector::new();
    let mut notes: Vec<String> = Vec::new();

    for node in following_siblings(&anchor) {
        let text = dom::node_collapsed_text(&node);
        if text.is_empty() {
            continue;
        }
        if STOP_MARKERS.iter().any(|marker| text.contains(marker)) {
            break;
        }
        if is_note_line(&text) {
            if !notes.contains(&text) {
                notes.push(text);
            }
            continue;
        }
        if node.is_element() && node_marks_heading(&Selection::from(node), &text, options) {
            collector.push(ContentBlock::Heading(text));
        } else {
            collector.push(ContentBlock::Paragraph {
                text,
                emphasized: false,
            });
        }
    }
    (collector.into_blocks(), notes)
}

/// Style-driven heading test. When the element itself carries no style,
/// a child wrapping the entire text speaks for it (sellers bold a span
/// inside an unstyled paragraph).
fn node_marks_heading(sel: &Selection, text: &str, options: &Options) -> bool {
    if dom::get_attribute(sel, "style").is_some_and(|style| style_marks_heading(&style, options))
    {
        return true;
    }
    sel.children().nodes().iter().any(|child| {
        dom::node_collapsed_text(child) == text
            && node_marks_heading(&Selection::from(*child), text, options)
    })
}

fn is_note_line(text: &str) -> bool {
    NOTE_PREFIXES.iter().any(|prefix| {
        text.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Whether the element reads as one text line: nothing block-level
/// nested inside it.
fn is_text_line(sel: &Selection) -> bool {
    sel.children().nodes().iter().all(|child| {
        !matches!(
            dom::node_tag(child).as_str(),
            "div" | "p" | "ul" | "ol" | "table" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        )
    })
}

/// Drops the "WARNING" header from a disclosure line, keeping the body
/// of the warning itself.
fn strip_warning_header(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(pos) = trimmed.find("WARNING") {
        let rest = trimmed[pos + "WARNING".len()..].trim_start_matches([':', ' ']);
        if !rest.is_empty() {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}
