//! Client for the authenticated message store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use draft_core::{ContextLookup, DraftError};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::decode::{collapse_whitespace, decode_base64url, html_to_text};
use crate::error::MailStoreError;
use crate::types::{Message, MessageMeta, Thread};
use crate::TokenProvider;

/// Configuration for [`MailStoreClient`].
#[derive(Debug, Clone)]
pub struct MailStoreConfig {
    /// Base URL of the message store, including the account segment.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for MailStoreConfig {
    fn default() -> Self {
        Self {
            api_url: "https://gmail.googleapis.com/gmail/v1/users/me".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl MailStoreConfig {
    /// Set the base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// Client that resolves a thread's newest inbound body as plain text.
pub struct MailStoreClient {
    http: reqwest::Client,
    config: MailStoreConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl MailStoreClient {
    /// Create a new client.
    pub fn new(
        config: MailStoreConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, MailStoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailStoreError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Fetch the plaintext body of the newest non-outgoing message in a
    /// thread.
    #[instrument(skip(self))]
    pub async fn latest_inbound_body(&self, thread_id: &str) -> Result<String, MailStoreError> {
        let token = self.tokens.access_token().await?;

        let thread = self.fetch_thread(&token, thread_id).await?;
        let meta = select_latest_inbound(&thread)
            .ok_or_else(|| MailStoreError::NotFound(format!("no inbound message in thread {}", thread_id)))?;

        debug!(message_id = %meta.id, "Selected newest inbound message");

        let message = self.fetch_message(&token, &meta.id).await?;
        extract_body_text(&message)
    }

    async fn fetch_thread(&self, token: &str, thread_id: &str) -> Result<Thread, MailStoreError> {
        let url = format!("{}/threads/{}", self.config.api_url, thread_id);
        self.get_json(token, &url).await
    }

    async fn fetch_message(&self, token: &str, message_id: &str) -> Result<Message, MailStoreError> {
        let url = format!("{}/messages/{}?format=full", self.config.api_url, message_id);
        self.get_json(token, &url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        url: &str,
    ) -> Result<T, MailStoreError> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| MailStoreError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(MailStoreError::Unauthorized(body))
            }
            StatusCode::NOT_FOUND => Err(MailStoreError::NotFound(url.to_string())),
            status if !status.is_success() => Err(MailStoreError::Network(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            ))),
            _ => response
                .json()
                .await
                .map_err(|e| MailStoreError::Malformed(e.to_string())),
        }
    }
}

/// Pick the most recent message not carrying the outgoing label.
fn select_latest_inbound(thread: &Thread) -> Option<&MessageMeta> {
    thread.messages.iter().rev().find(|meta| !meta.is_outgoing())
}

/// Extract a message's body as plain text, preferring a `text/plain` part
/// and falling back to a stripped `text/html` part.
fn extract_body_text(message: &Message) -> Result<String, MailStoreError> {
    let payload = message.payload.as_ref().ok_or(MailStoreError::EmptyBody)?;

    let text = if let Some(part) = payload.find_part("text/plain") {
        let data = part
            .body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .ok_or(MailStoreError::EmptyBody)?;
        collapse_whitespace(&decode_base64url(data)?)
    } else if let Some(part) = payload.find_part("text/html") {
        let data = part
            .body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .ok_or(MailStoreError::EmptyBody)?;
        html_to_text(&decode_base64url(data)?)?
    } else {
        return Err(MailStoreError::EmptyBody);
    };

    if text.is_empty() {
        return Err(MailStoreError::EmptyBody);
    }
    Ok(text)
}

#[async_trait]
impl ContextLookup for MailStoreClient {
    async fn thread_context(&self, thread_id: &str) -> Result<String, DraftError> {
        self.latest_inbound_body(thread_id).await.map_err(|e| {
            warn!(%thread_id, "Rich context lookup failed: {}", e);
            DraftError::ContextUnavailable(e.to_string())
        })
    }
}
