//! Provider API request and response types.

use serde::{Deserialize, Serialize};

/// A chat message for OpenAI-shaped requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Error body returned by both providers on non-success status.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error detail
    pub error: ApiErrorDetail,
}

/// Error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message
    pub message: String,
}
