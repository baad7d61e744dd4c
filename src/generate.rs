//! End-to-end generation pipeline.
//!
//! Chains the fetcher, the image extractor, the selected format grammar
//! and the template injector into one request-scoped operation. Every
//! subsystem degrades independently: missing images or an empty
//! extraction section produce a warning entry, not a failure. The one
//! hard requirement is the description document itself; without it no
//! artifact is produced.

use crate::dom;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::formats;
use crate::images::{extract_images, ImageSet};
use crate::inject;
use crate::listing::{NormalizedListing, SourceFormat};
use crate::options::Options;

/// Everything one generate run produced.
#[derive(Debug)]
pub struct GeneratedListing {
    /// Final rendered HTML artifact.
    pub html: String,
    /// The normalized listing the artifact was rendered from.
    pub listing: NormalizedListing,
    /// Extracted gallery images.
    pub images: ImageSet,
    /// Raw description HTML, retained for the inline source view.
    pub source_html: String,
    /// One entry per subsystem that degraded to empty output.
    pub warnings: Vec<String>,
}

/// Drives the fetch, extract and inject stages for one listing at a time.
///
/// [`Generator::generate`] runs the whole pipeline; the individual stages
/// are public so a driver can interleave its own progress reporting.
pub struct Generator {
    fetcher: Fetcher,
    options: Options,
}

impl Generator {
    /// Generator with a network-backed fetcher.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let fetcher = Fetcher::new(&options);
        Self { fetcher, options }
    }

    /// Generator over a caller-supplied fetcher. Tests seed the
    /// fetcher's cache to run the pipeline without a network.
    #[must_use]
    pub fn with_fetcher(fetcher: Fetcher, options: Options) -> Self {
        Self { fetcher, options }
    }

    /// Fetches the description document behind a listing page.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`] when the fetch chain yields no
    /// document.
    pub fn fetch_source(&self, listing_url: &str) -> Result<String> {
        self.fetcher
            .fetch_description(listing_url)
            .ok_or(Error::SourceUnavailable)
    }

    /// Fetches the gallery page for an item and extracts its image URLs.
    ///
    /// A failed gallery fetch degrades to an empty set rather than
    /// erroring; the gallery section of the template is then left as-is.
    #[must_use]
    pub fn fetch_images(&self, item_id: &str) -> ImageSet {
        match self.fetcher.fetch_gallery(item_id) {
            Some(gallery_html) => extract_images(&gallery_html, &self.options),
            None => ImageSet::new(),
        }
    }

    /// Extracts the normalized listing from a fetched description document.
    #[must_use]
    pub fn extract(&self, format: SourceFormat, source_html: &str) -> NormalizedListing {
        let doc = dom::parse(source_html);
        formats::extract_listing(format, &doc, &self.options)
    }

    /// Runs one complete generation and renders the artifact.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`] when the description fetch chain
    /// yields no document; [`Error::EmptyTemplate`] when the template
    /// text is blank.
    pub fn generate(
        &self,
        format: SourceFormat,
        listing_url: &str,
        item_id: &str,
        template_html: &str,
    ) -> Result<GeneratedListing> {
        let source_html = self.fetch_source(listing_url)?;
        let images = self.fetch_images(item_id);
        let listing = self.extract(format, &source_html);
        let warnings = degradation_warnings(&listing, &images);

        let html = inject::inject(template_html, &listing, &images, format)?;
        Ok(GeneratedListing {
            html,
            listing,
            images,
            source_html,
            warnings,
        })
    }
}

/// One warning per pipeline subsystem that came back empty.
#[must_use]
pub fn degradation_warnings(listing: &NormalizedListing, images: &ImageSet) -> Vec<String> {
    let mut warnings = Vec::new();
    if images.is_empty() {
        warnings.push("no gallery images; gallery section left unchanged".to_string());
    }
    if listing.title.is_none() {
        warnings.push("no title found in the description document".to_string());
    }
    if listing.description.is_empty() {
        warnings.push("description walk produced no blocks".to_string());
    }
    if listing.specs.is_empty() {
        warnings.push("no specification data found".to_string());
    }
    if listing.compatibility.is_empty() {
        warnings.push("no compatibility data found".to_string());
    }
    warnings
}
