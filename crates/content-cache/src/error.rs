//! Error types for content fetching.

use thiserror::Error;

/// Errors that can occur while fetching a single source.
///
/// These never escape the cache: a failed source contributes empty text and
/// the aggregation carries on.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The source could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The source answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The fetched body could not be converted to text.
    #[error("content conversion failed: {0}")]
    Conversion(String),
}
