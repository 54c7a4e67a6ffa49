//! Authenticated message-store lookup.
//!
//! Exchanges an OAuth-style token for a conversation's messages, selects
//! the most recent message that is not outgoing, and extracts its body as
//! plain text. Used by the orchestrator as an optional richer alternative
//! to the text scraped from the visible page.

mod client;
mod decode;
mod error;
mod types;

pub use client::{MailStoreClient, MailStoreConfig};
pub use decode::{decode_base64url, html_to_text};
pub use error::MailStoreError;
pub use types::{Message, MessageMeta, MessagePart, PartBody, Thread};

/// Supplies a bearer token for message-store calls.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a currently valid access token.
    async fn access_token(&self) -> Result<String, MailStoreError>;
}

/// A fixed token, for embeddings that manage refresh themselves.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait::async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, MailStoreError> {
        if self.0.trim().is_empty() {
            return Err(MailStoreError::Unauthorized("empty access token".to_string()));
        }
        Ok(self.0.clone())
    }
}
