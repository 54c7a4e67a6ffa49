//! Error taxonomy for drafting operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while producing a draft.
#[derive(Debug, Error)]
pub enum DraftError {
    /// No API key is configured; no completion call is attempted.
    #[error("API key not configured")]
    MissingApiKey,

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The completion endpoint could not be reached.
    #[error("completion endpoint unreachable: {0}")]
    Network(String),

    /// The completion endpoint answered, but the body could not be understood.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// The completion succeeded but carried no usable text.
    ///
    /// Kept distinct from [`DraftError::Network`] so callers can tell an
    /// empty choice list apart from an unreachable endpoint.
    #[error("completion returned no usable text")]
    EmptyCompletion,

    /// The completion call did not finish within the deadline.
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    /// The authenticated message lookup failed.
    ///
    /// Inside a draft request this is swallowed in favor of the
    /// page-supplied context; it is only surfaced on an explicit
    /// context-fetch request.
    #[error("message lookup failed: {0}")]
    ContextUnavailable(String),
}
