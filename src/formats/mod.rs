//! Format grammars for the supported listing layouts.
//!
//! Each marketplace storefront renders its description iframe with a
//! different HTML dialect. A [`FormatGrammar`] knows how to read one of
//! those dialects and produce the same normalized output as every other
//! grammar: a title, a sequence of content blocks, a specification
//! section and zero or more compatibility groups. The selection of a
//! grammar is explicit (the caller names the format tag); grammars never
//! sniff each other's markup.

use std::collections::HashSet;

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::listing::{
    CompatibilityGroup, ContentBlock, NormalizedListing, SourceFormat, SpecSection,
};
use crate::options::Options;
use crate::patterns::{BOLD_WEIGHT, FONT_SIZE_PT};

mod carparts;
mod ourstore;
mod xtreme;

pub use carparts::Carparts;
pub use ourstore::OurStore;
pub use xtreme::Xtreme;

/// A reader for one storefront's description markup.
///
/// All methods are total: malformed or partial markup yields empty
/// collections, never an error. Missing sections are a normal outcome
/// (plenty of listings carry no compatibility table at all).
pub trait FormatGrammar {
    /// The format this grammar reads.
    fn format(&self) -> SourceFormat;

    /// Pulls the listing title out of the description document.
    fn extract_title(&self, doc: &Document) -> Option<String>;

    /// Walks the description region and emits normalized content blocks.
    fn clean_description(&self, doc: &Document, options: &Options) -> Vec<ContentBlock>;

    /// Reads the specification table, when one exists.
    fn extract_specs(&self, doc: &Document, options: &Options) -> SpecSection;

    /// Reads vehicle compatibility data grouped by brand.
    fn extract_compatibility(&self, doc: &Document, options: &Options)
        -> Vec<CompatibilityGroup>;

    /// Reads standalone note lines. Most formats interleave notes with
    /// the description, so the default is empty.
    fn extract_notes(&self, _doc: &Document, _options: &Options) -> Vec<String> {
        Vec::new()
    }
}

/// Returns the grammar for a format tag.
#[must_use]
pub fn grammar_for(format: SourceFormat) -> &'static dyn FormatGrammar {
    match format {
        SourceFormat::Xtreme => &Xtreme,
        SourceFormat::Carparts => &Carparts,
        SourceFormat::OurStore => &OurStore,
    }
}

/// Runs every extraction pass of a grammar over one parsed description
/// document and assembles the result.
#[must_use]
pub fn extract_listing(
    format: SourceFormat,
    doc: &Document,
    options: &Options,
) -> NormalizedListing {
    let grammar = grammar_for(format);
    NormalizedListing {
        title: grammar.extract_title(doc),
        description: grammar.clean_description(doc, options),
        specs: grammar.extract_specs(doc, options),
        compatibility: grammar.extract_compatibility(doc, options),
        notes: grammar.extract_notes(doc, options),
    }
}

/// Accumulates content blocks while suppressing repeats.
///
/// Storefront markup frequently duplicates text (a heading rendered
/// once for desktop and once for mobile, say). The collector keeps the
/// first occurrence and drops the rest, comparing on the normalized
/// block text.
pub(crate) struct BlockCollector {
    blocks: Vec<ContentBlock>,
    seen: HashSet<String>,
}

impl BlockCollector {
    pub(crate) fn new() -> Self {
        Self {
            blocks: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Appends a block unless an identical one was already emitted.
    /// Returns `true` when the block was kept.
    pub(crate) fn push(&mut self, block: ContentBlock) -> bool {
        let key = block.dedup_key();
        if key.is_empty() || !self.seen.insert(key) {
            return false;
        }
        self.blocks.push(block);
        true
    }

    pub(crate) fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks
    }
}

/// Whether an inline style renders its text as a heading: an explicit
/// bold weight, or a font size at or above the configured point
/// threshold.
pub(crate) fn style_marks_heading(style: &str, options: &Options) -> bool {
    if BOLD_WEIGHT.is_match(style) {
        return true;
    }
    if let Some(caps) = FONT_SIZE_PT.captures(style) {
        if let Some(size) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
            return size >= options.style_heading_min_pt;
        }
    }
    false
}

/// First element in document order whose collapsed text equals the
/// marker, ignoring ASCII case. Matching outermost-first means a
/// wrapper that holds nothing but the heading anchors the walk at the
/// level where the content actually flows.
pub(crate) fn anchor_by_text<'a>(region: &Selection<'a>, marker: &str) -> Option<Selection<'a>> {
    let root = region.nodes().first()?;
    for node in root.descendants() {
        if !node.is_element() {
            continue;
        }
        let text = dom::node_collapsed_text(&node);
        if text.eq_ignore_ascii_case(marker) {
            return Some(Selection::from(node));
        }
    }
    None
}

/// All siblings after the anchor, in document order. Text nodes are
/// included; callers filter for what they need.
pub(crate) fn following_siblings<'a>(anchor: &Selection<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let Some(first) = anchor.nodes().first() else {
        return out;
    };
    let mut cursor = first.next_sibling();
    while let Some(node) = cursor {
        cursor = node.next_sibling();
        out.push(node);
    }
    out
}

/// Collapsed text of every cell in every row of a table. Rows without
/// cells are skipped; empty cells are kept so column alignment survives.
pub(crate) fn table_cell_rows(table: &Selection) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for tr in table.select("tr").nodes() {
        let cells: Vec<String> = Selection::from(*tr)
            .select("td, th")
            .nodes()
            .iter()
            .map(dom::node_collapsed_text)
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    rows
}

/// Closes out the compatibility group being accumulated, if it holds
/// anything, and resets the accumulator for the next one.
pub(crate) fn flush_group(
    groups: &mut Vec<CompatibilityGroup>,
    brand: &mut Option<String>,
    items: &mut Vec<String>,
) {
    if brand.is_some() || !items.is_empty() {
        groups.push(CompatibilityGroup {
            brand: brand.take(),
            items: std::mem::take(items),
        });
    }
}

/// Collapsed text of every `li` under the selection, skipping empties.
pub(crate) fn list_items(sel: &Selection) -> Vec<String> {
    let mut items = Vec::new();
    for li in sel.select("li").nodes() {
        let text = dom::node_collapsed_text(li);
        if !text.is_empty() {
            items.push(text);
        }
    }
    items
}
