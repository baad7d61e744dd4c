//! Compiled regex patterns and CSS selectors shared across the pipeline.
//!
//! All patterns are compiled once at startup using `LazyLock`. Selector and
//! marker literals that more than one module needs live here; heuristics
//! private to a single source grammar stay in that grammar's module.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Image URL Patterns
// =============================================================================

/// Matches the resolution token embedded in marketplace image URLs
/// (`s-l140`, `s-l500`, `s-l1600`, any digit width).
pub static RESOLUTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"s-l\d+").expect("RESOLUTION_TOKEN regex"));

/// Canonical full-resolution token written into extracted image URLs.
pub const HIGH_RES_TOKEN: &str = "s-l1600";

/// Low-resolution token substituted in when deriving thumbnail URLs.
pub const THUMB_TOKEN: &str = "s-l140";

/// Prefix marking an inline placeholder image rather than a real URL.
pub const DATA_URI_MARKER: &str = "data:image";

// =============================================================================
// Inline Style Probes
// =============================================================================

/// Captures a point-unit font size from an inline style attribute.
pub static FONT_SIZE_PT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)font-size\s*:\s*(\d+(?:\.\d+)?)\s*pt").expect("FONT_SIZE_PT regex")
});

/// Captures a pixel-unit font size from an inline style attribute.
pub static FONT_SIZE_PX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)font-size\s*:\s*(\d+(?:\.\d+)?)\s*px").expect("FONT_SIZE_PX regex")
});

/// Matches a bold font-weight declaration (`bold`, `bolder`, or 700+).
pub static BOLD_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)font-weight\s*:\s*(?:bold|bolder|[7-9]00)").expect("BOLD_WEIGHT regex")
});

/// Matches a fully transparent opacity declaration.
pub static OPACITY_ZERO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)opacity\s*:\s*0(?:\.0+)?\s*(;|$)").expect("OPACITY_ZERO regex")
});

/// Matches a white text color declaration (white-on-white tracking spans).
pub static WHITE_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)color\s*:\s*(#fff(?:fff)?|white)\s*(;|$)").expect("WHITE_COLOR regex")
});

// =============================================================================
// Text Patterns
// =============================================================================

/// Matches runs of whitespace for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

/// Splits a `Key: Value` specification line. The key group is kept short so
/// prose sentences containing a colon are not mistaken for spec rows.
pub static SPEC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]{2,40}?)\s*:\s*(\S.*)$").expect("SPEC_LINE regex")
});

// =============================================================================
// "Our Store" Contract Literals
// =============================================================================

/// Phrases that terminate the Our Store description walk. The check is a
/// plain substring match, so the singular form also covers the plural.
pub const STOP_MARKERS: &[&str] = &[
    "Specification",
    "Specifications",
    "Technical Details",
    "Compatibility",
    "Compatible with the following vehicles",
    "Proposition 65",
    "P65Warnings.ca.gov",
];

/// Attribute keys accepted from colon-delimited `Key: Value` lines.
pub const SPEC_KEY_ALLOWLIST: &[&str] = &[
    "Brand",
    "Manufacturer Part Number",
    "Part Number",
    "Interchange Part Number",
    "Color",
    "Material",
    "Finish",
    "Placement on Vehicle",
    "Fitment Type",
    "Warranty",
    "Condition",
    "Country/Region of Manufacture",
    "Items Included",
    "Voltage",
    "Wattage",
    "Quantity",
];

/// Labels whose immediately following list becomes one comma-joined
/// attribute value, and the key each maps to.
pub const SPEC_LIST_LABELS: &[(&str, &str)] = &[
    ("Features", "Features"),
    ("Package Includes", "Package Includes"),
];

/// URL substring identifying a California Proposition 65 disclosure line.
pub const PROP65_URL_MARKER: &str = "P65Warnings.ca.gov";

/// Attribute key the disclosure is always published under.
pub const PROP65_KEY: &str = "California Prop 65 Warning";

/// Disclosure text synthesized when the source carries none.
pub const PROP65_FALLBACK: &str = "This product can expose you to chemicals including \
    lead, which is known to the State of California to cause cancer and birth defects \
    or other reproductive harm. For more information go to www.P65Warnings.ca.gov.";

/// Line prefixes that divert a description line into the notes section.
pub const NOTE_PREFIXES: &[&str] = &["Note:", "Notes:", "Please note"];

// =============================================================================
// Source Page Selectors
// =============================================================================

/// Gallery container on the marketplace item page.
pub const GALLERY_CONTAINER_SELECTOR: &str = "div.ux-image-grid";

/// Image elements inside the gallery item buttons.
pub const GALLERY_IMAGE_SELECTOR: &str = "button.ux-image-grid-item img";

/// Iframe on the listing page whose `src` holds the description document URL.
pub const DESCRIPTION_IFRAME_SELECTOR: &str = "iframe#desc_ifr";

/// Marketplace item page URL prefix; the item id is appended.
pub const ITEM_PAGE_BASE: &str = "https://www.ebay.com/itm/";

// =============================================================================
// Template Anchor Selectors
// =============================================================================

/// Gallery container rebuilt with the radio-input tab gallery.
pub const TEMPLATE_GALLERY_SELECTOR: &str = ".product-image-box";

/// Title heading whose text is replaced with the extracted title.
pub const TEMPLATE_TITLE_SELECTOR: &str = ".title h1";

/// Description container cleared and refilled with rendered content blocks.
pub const TEMPLATE_DESCRIPTION_SELECTOR: &str = ".middle-right .description-details";

/// Specification table whose body is cleared and refilled.
pub const TEMPLATE_SPEC_TABLE_SELECTOR: &str = "table.table";

/// Template sections scanned for the compatibility heading.
pub const TEMPLATE_SECTION_SELECTOR: &str = "div.description";

/// Detail container inside a template section.
pub const TEMPLATE_SECTION_DETAILS_SELECTOR: &str = "div.description-details";

/// Heading text identifying the template's compatibility section.
pub const COMPAT_HEADING_MARKER: &str = "Compatible with the following vehicles";

/// Inline style fragment identifying the template's notes section.
pub const NOTES_STYLE_MARKER: &str = "background-color: #fff3cd";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_token_matches_any_width() {
        assert!(RESOLUTION_TOKEN.is_match("https://i.example.com/abc/s-l140.jpg"));
        assert!(RESOLUTION_TOKEN.is_match("https://i.example.com/abc/s-l500.webp"));
        assert!(RESOLUTION_TOKEN.is_match("https://i.example.com/abc/s-l1600.jpg"));
        assert!(!RESOLUTION_TOKEN.is_match("https://i.example.com/abc/large.jpg"));
    }

    #[test]
    fn font_size_pt_captures_value() {
        let caps = FONT_SIZE_PT
            .captures("font-weight: normal; font-size: 14.5pt;")
            .expect("style should match");
        assert_eq!(&caps[1], "14.5");
    }

    #[test]
    fn bold_weight_matches_numeric_and_keyword() {
        assert!(BOLD_WEIGHT.is_match("font-weight: bold"));
        assert!(BOLD_WEIGHT.is_match("font-weight:700;"));
        assert!(!BOLD_WEIGHT.is_match("font-weight: 400"));
    }

    #[test]
    fn opacity_zero_requires_exact_zero() {
        assert!(OPACITY_ZERO.is_match("opacity: 0"));
        assert!(OPACITY_ZERO.is_match("opacity:0.00;"));
        assert!(!OPACITY_ZERO.is_match("opacity: 0.5"));
    }

    #[test]
    fn spec_line_splits_key_and_value() {
        let caps = SPEC_LINE.captures("Placement on Vehicle: Front Left").expect("line");
        assert_eq!(&caps[1], "Placement on Vehicle");
        assert_eq!(&caps[2], "Front Left");
        assert!(SPEC_LINE.captures("No separator here").is_none());
    }

    #[test]
    fn whitespace_normalize_collapses_spaces() {
        let result = WHITESPACE_NORMALIZE.replace_all("hello \t\n world", " ");
        assert_eq!(result, "hello world");
    }

    #[test]
    fn stop_markers_cover_the_compatibility_heading() {
        assert!(STOP_MARKERS.contains(&COMPAT_HEADING_MARKER));
        assert!(STOP_MARKERS.contains(&PROP65_URL_MARKER));
    }
}
