//! Gallery image extraction.
//!
//! Parses the marketplace gallery block into an ordered, deduplicated,
//! resolution-normalized set of image URLs. The gallery markup carries a
//! resolution token in each URL (`s-l140`, `s-l500`, ...) which is rewritten
//! to the full-resolution variant; thumbnails are derived on demand by the
//! reverse substitution and never stored.

use serde::{Deserialize, Serialize};

use crate::dom::{self, Selection};
use crate::options::Options;
use crate::patterns::{
    DATA_URI_MARKER, GALLERY_CONTAINER_SELECTOR, GALLERY_IMAGE_SELECTOR, HIGH_RES_TOKEN,
    RESOLUTION_TOKEN, THUMB_TOKEN,
};

/// Ordered set of full-resolution gallery image URLs.
///
/// Holds at most the configured cap, preserves source gallery order, and
/// contains no duplicates and no placeholder-video URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    urls: Vec<String>,
}

impl ImageSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from URLs that are already normalized, dropping duplicates.
    #[must_use]
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for url in urls {
            set.push(url.into());
        }
        set
    }

    /// Image URLs in gallery order.
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// True when the gallery yielded no usable images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn push(&mut self, url: String) {
        if !self.urls.contains(&url) {
            self.urls.push(url);
        }
    }
}

/// Extract gallery images from a fetched item page.
///
/// Locates the gallery container, reads each item's image source (falling
/// back to the lazy-load `data-src` attribute when `src` is an inline
/// placeholder), discards video-placeholder tiles, normalizes the resolution
/// token, and truncates to the configured cap. Total: any parse miss yields
/// an empty set.
#[must_use]
pub fn extract_images(gallery_html: &str, options: &Options) -> ImageSet {
    let mut set = ImageSet::new();
    if gallery_html.trim().is_empty() {
        return set;
    }

    let doc = dom::parse(gallery_html);
    let gallery = doc.select(GALLERY_CONTAINER_SELECTOR);
    if !gallery.exists() {
        return set;
    }

    for node in gallery.select(GALLERY_IMAGE_SELECTOR).nodes() {
        let img = Selection::from(*node);
        let Some(source) = image_source(&img) else {
            continue;
        };
        if source.contains(options.video_placeholder_marker.as_str()) {
            continue;
        }

        set.push(normalize_resolution(&source));
        if set.len() >= options.max_images {
            break;
        }
    }

    set
}

/// Primary image source with lazy-load fallback.
fn image_source(img: &Selection) -> Option<String> {
    let usable = |value: &String| !value.trim().is_empty() && !value.contains(DATA_URI_MARKER);

    dom::get_attribute(img, "src")
        .filter(usable)
        .or_else(|| dom::get_attribute(img, "data-src").filter(usable))
}

/// Rewrite any resolution token in the URL to the canonical full-resolution
/// token. Idempotent.
#[must_use]
pub fn normalize_resolution(url: &str) -> String {
    RESOLUTION_TOKEN.replace_all(url, HIGH_RES_TOKEN).into_owned()
}

/// Derive the thumbnail variant of a normalized image URL.
#[must_use]
pub fn thumbnail_url(url: &str) -> String {
    url.replace(HIGH_RES_TOKEN, THUMB_TOKEN)
}
