//! Error types for the message-store lookup.

use thiserror::Error;

/// Errors that can occur during an authenticated message lookup.
#[derive(Debug, Error)]
pub enum MailStoreError {
    /// The token was rejected or missing.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The store could not be reached.
    #[error("message store unreachable: {0}")]
    Network(String),

    /// The thread or message does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be understood.
    #[error("malformed store response: {0}")]
    Malformed(String),

    /// A payload part could not be decoded.
    #[error("payload decode failed: {0}")]
    Decode(String),

    /// The selected message carried no usable body text.
    #[error("message has no readable body")]
    EmptyBody,
}
