//! Normalized listing representation.
//!
//! Every grammar produces the same intermediate shape: a title, ordered
//! description blocks, a specification section, compatibility groups, and
//! free-text notes. The representation is built fresh per generate request
//! and is the only data that crosses from the parsed source document to the
//! template being rewritten.

use serde::{Deserialize, Serialize};

/// Source page layout a listing is scraped from.
///
/// The tag selects which grammar strategy runs; each strategy hard-codes the
/// selectors and heuristics of one marketplace template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// "Xtreme" template family: descendant walk, structural heuristics.
    Xtreme,
    /// "Carparts" template family: sibling walk, mojibake-prone text.
    Carparts,
    /// "Our Store" template family: style-attribute driven markup.
    OurStore,
}

impl SourceFormat {
    /// All formats, in operator-menu order.
    pub const ALL: [SourceFormat; 3] =
        [SourceFormat::Xtreme, SourceFormat::Carparts, SourceFormat::OurStore];

    /// Parse an operator-facing format tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "xtreme" => Some(Self::Xtreme),
            "carparts" => Some(Self::Carparts),
            "ourstore" | "our-store" | "our_store" => Some(Self::OurStore),
            _ => None,
        }
    }

    /// Canonical tag for this format.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Xtreme => "xtreme",
            Self::Carparts => "carparts",
            Self::OurStore => "ourstore",
        }
    }
}

/// One typed block of description content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlock {
    /// Section heading.
    Heading(String),
    /// Body paragraph; `emphasized` renders the text bolded.
    Paragraph {
        text: String,
        emphasized: bool,
    },
    /// Bulleted list, items in source order.
    List(Vec<String>),
}

impl ContentBlock {
    /// Collapsed text identity used for duplicate suppression.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        match self {
            Self::Heading(text) | Self::Paragraph { text, .. } => text.clone(),
            Self::List(items) => items.join(" "),
        }
    }
}

/// One key/value row of the specification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRow {
    pub key: String,
    pub value: String,
}

/// Insertion-ordered specification attributes with deduplicated keys.
///
/// A key keeps the position of its first insertion; re-inserting overwrites
/// the value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecTable {
    rows: Vec<SpecRow>,
}

impl SpecTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, overwriting the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(row) = self.rows.iter_mut().find(|row| row.key == key) {
            row.value = value;
        } else {
            self.rows.push(SpecRow { key, value });
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.key == key)
            .map(|row| row.value.as_str())
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.iter().any(|row| row.key == key)
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[SpecRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Specification content of a normalized listing.
///
/// Xtreme and Carparts copy literal table rows from the source; Our Store
/// assembles an attribute table from labeled text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecSection {
    /// Cell texts copied row by row from a located source table.
    Rows(Vec<Vec<String>>),
    /// Key/value attributes extracted from text.
    Pairs(SpecTable),
}

impl SpecSection {
    /// True when the section holds nothing to render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Rows(rows) => rows.is_empty(),
            Self::Pairs(table) => table.is_empty(),
        }
    }
}

impl Default for SpecSection {
    fn default() -> Self {
        Self::Rows(Vec::new())
    }
}

/// One brand's group of compatible items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityGroup {
    /// Brand heading. Items encountered before any brand header accumulate
    /// in a leading group without one.
    pub brand: Option<String>,
    /// Compatible-item descriptions, in source order.
    pub items: Vec<String>,
}

/// Everything extracted from one source listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedListing {
    /// Item title, when the source exposes one.
    pub title: Option<String>,
    /// Ordered description blocks.
    pub description: Vec<ContentBlock>,
    /// Specification table content.
    pub specs: SpecSection,
    /// Vehicle-compatibility groups.
    pub compatibility: Vec<CompatibilityGroup>,
    /// Free-text notes rendered into the template's note box.
    pub notes: Vec<String>,
}

impl NormalizedListing {
    /// True when no section extracted anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_empty()
            && self.specs.is_empty()
            && self.compatibility.is_empty()
            && self.notes.is_empty()
    }
}
