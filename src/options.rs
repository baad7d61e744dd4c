//! Configuration options for listing extraction and injection.
//!
//! The `Options` struct carries the tuned thresholds of the three source
//! grammars. The numeric values are contract values calibrated against real
//! marketplace pages, not illustrative defaults; change them only when the
//! source layout they were tuned against changes.

/// Configuration options for listing extraction and injection.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use relist::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     max_images: 7,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum number of gallery images kept in the extracted set.
    ///
    /// Source galleries carry a dozen or more items; the template's CSS tab
    /// gallery is laid out for six. Earlier template generations used seven.
    ///
    /// Default: `6`
    pub max_images: usize,

    /// URL fragment identifying the marketplace's video-placeholder tile.
    ///
    /// Gallery items whose image URL contains this marker are stills for an
    /// embedded video, not product photos, and are discarded.
    ///
    /// Default: `"DOcAAOSw8NplLtwK"`
    pub video_placeholder_marker: String,

    /// Maximum text length for the Xtreme short-text heading promotion.
    ///
    /// A walked node whose collapsed text is shorter than this (and has no
    /// nested span) is treated as a heading candidate. Tuned per template
    /// generation between 30 and 40 characters.
    ///
    /// Default: `40`
    pub heading_max_chars: usize,

    /// Maximum text length for the Carparts list-intro rule.
    ///
    /// A paragraph shorter than this immediately preceding a list is marked
    /// emphasized.
    ///
    /// Default: `50`
    pub intro_max_chars: usize,

    /// Maximum text length for the structural brand-header heuristic.
    ///
    /// In the Xtreme compatibility region, a node with collapsed text
    /// shorter than this is classified as a brand header.
    ///
    /// Default: `12`
    pub brand_max_chars: usize,

    /// Minimum inline font size (in points) for the Our Store heading rule.
    ///
    /// Our Store pages mark headings purely with style attributes; a
    /// font-size at or above this threshold (or a bold font-weight)
    /// classifies the node as a heading.
    ///
    /// Default: `13.0`
    pub style_heading_min_pt: f64,

    /// Per-request network timeout, in seconds.
    ///
    /// Applied globally to each fetch; on timeout the fetch reports
    /// "unavailable" and the affected section degrades to empty.
    ///
    /// Default: `20`
    pub fetch_timeout_secs: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_images: 6,
            video_placeholder_marker: "DOcAAOSw8NplLtwK".to_string(),
            heading_max_chars: 40,
            intro_max_chars: 50,
            brand_max_chars: 12,
            style_heading_min_pt: 13.0,
            fetch_timeout_secs: 20,
        }
    }
}
