//! # relist
//!
//! Marketplace listing scraper and HTML template generator.
//!
//! This library fetches a product listing's description document and image
//! gallery, normalizes the description through one of three storefront
//! format grammars, and splices the result into the fixed anchor points of
//! an HTML listing template.
//!
//! ## Quick Start
//!
//! ```rust
//! use relist::{extract_listing, render_listing, ImageSet, Options, SourceFormat};
//!
//! let description = r#"<div class="desc-box"><h3>Premium Floor Liner</h3>
//! <p>Custom molded to match the factory floor pan for a precise fit.</p></div>"#;
//! let template = r#"<html><head><style></style></head><body>
//! <div class="title"><h1>Placeholder</h1></div>
//! <div class="middle-right"><div class="description-details"></div></div>
//! </body></html>"#;
//!
//! let listing = extract_listing(SourceFormat::Xtreme, description, &Options::default());
//! let page = render_listing(template, &listing, &ImageSet::new(), SourceFormat::Xtreme)?;
//! assert!(page.contains("Premium Floor Liner"));
//! # Ok::<(), relist::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Fetching**: the listing page, the description document its iframe
//!   points at, and the image gallery page by item id, memoized through an
//!   injectable cache
//! - **Image Extraction**: the gallery grid as a deduplicated,
//!   resolution-normalized, length-capped URL list
//! - **Format Grammars**: three storefront dialects normalized into one
//!   listing representation
//! - **Injection**: deterministic merge into the template, section by
//!   section, each section skipped when its data or anchor is absent

mod error;
mod listing;
mod options;
mod patterns;

/// DOM helpers over dom_query: parsing, text collapsing, entity escapes.
pub mod dom;

/// Character encoding detection, transcoding, and mojibake repair.
pub mod encoding;

/// HTTP fetching with a browser header set and an injectable cache.
pub mod fetch;

/// Format grammars normalizing storefront description markup.
pub mod formats;

/// End-to-end pipeline: fetch, extract, render.
pub mod generate;

/// Gallery image URL extraction and resolution normalization.
pub mod images;

/// Template injection into fixed anchor points.
pub mod inject;

// Public API - re-exports
pub use error::{Error, Result};
pub use generate::{GeneratedListing, Generator};
pub use images::ImageSet;
pub use listing::{
    CompatibilityGroup, ContentBlock, NormalizedListing, SourceFormat, SpecRow, SpecSection,
    SpecTable,
};
pub use options::Options;

/// Extracts a normalized listing from a description document.
///
/// # Arguments
///
/// * `format` - The storefront grammar to read the markup with
/// * `description_html` - The description document as a string slice
/// * `options` - Configuration options for extraction thresholds
///
/// # Returns
///
/// Returns a [`NormalizedListing`]. Sections the document does not carry
/// come back empty rather than failing; extraction itself cannot error.
///
/// # Example
///
/// ```rust
/// use relist::{extract_listing, Options, SourceFormat};
///
/// let html = r#"<div class="desc-box"><h3>Key Features</h3></div>"#;
/// let listing = extract_listing(SourceFormat::Xtreme, html, &Options::default());
/// assert_eq!(listing.description.len(), 1);
/// ```
#[must_use]
pub fn extract_listing(
    format: SourceFormat,
    description_html: &str,
    options: &Options,
) -> NormalizedListing {
    let doc = dom::parse(description_html);
    formats::extract_listing(format, &doc, options)
}

/// Extracts a normalized listing from description bytes with automatic
/// encoding detection.
///
/// This accepts the description document as raw bytes, detects the
/// character encoding from meta tags, and converts to UTF-8 before
/// extraction.
///
/// # Example
///
/// ```rust
/// use relist::{extract_listing_bytes, Options, SourceFormat};
///
/// // ISO-8859-1 encoded description with charset declaration
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><h1>Caf\xE9 Rack</h1></body></html>";
/// let listing = extract_listing_bytes(SourceFormat::Carparts, html, &Options::default());
/// assert_eq!(listing.title.as_deref(), Some("Caf\u{e9} Rack"));
/// ```
#[must_use]
pub fn extract_listing_bytes(
    format: SourceFormat,
    description_html: &[u8],
    options: &Options,
) -> NormalizedListing {
    let html_str = encoding::transcode_to_utf8(description_html);
    extract_listing(format, &html_str, options)
}

/// Renders a normalized listing and its images into a listing template.
///
/// Each template section is rewritten in place; sections whose data is
/// empty or whose anchor is missing from the template are left untouched.
///
/// # Arguments
///
/// * `template_html` - The listing template as a string slice
/// * `listing` - The normalized listing to splice in
/// * `images` - Gallery image URLs for the image carousel
/// * `format` - The source format, which selects format-specific styling
///
/// # Returns
///
/// Returns `Ok(String)` with the rendered page. Returns
/// [`Error::EmptyTemplate`] when the template text is blank.
///
/// # Example
///
/// ```rust
/// use relist::{render_listing, ImageSet, NormalizedListing, SourceFormat};
///
/// let template = r#"<html><body><div class="title"><h1></h1></div></body></html>"#;
/// let listing = NormalizedListing {
///     title: Some("Roof Rack Crossbars".to_string()),
///     ..NormalizedListing::default()
/// };
/// let page = render_listing(template, &listing, &ImageSet::new(), SourceFormat::OurStore)?;
/// assert!(page.contains("Roof Rack Crossbars"));
/// # Ok::<(), relist::Error>(())
/// ```
pub fn render_listing(
    template_html: &str,
    listing: &NormalizedListing,
    images: &ImageSet,
    format: SourceFormat,
) -> Result<String> {
    inject::inject(template_html, listing, images, format)
}
