//! Error types for listing generation.
//!
//! This module defines the error types returned by the generate and inject
//! operations. Per-section extraction never fails: missing anchors and
//! unavailable fetches degrade to empty output, so the variants here cover
//! only the cases that abort a whole generate request.

/// Error type for listing generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The template document is empty or contains no markup to rewrite.
    #[error("Template is empty or contains no markup")]
    EmptyTemplate,

    /// The listing description could not be fetched, so there is no source
    /// document to extract from and no artifact can be produced.
    #[error("Listing description could not be fetched")]
    SourceUnavailable,

    /// The format tag is not one of the known source formats.
    #[error("Unknown format tag: {0}")]
    UnknownFormat(String),
}

/// Result type alias for listing generation.
pub type Result<T> = std::result::Result<T, Error>;
