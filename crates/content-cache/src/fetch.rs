//! Fetching and cleaning of individual reference sources.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::CacheError;

/// Maximum bytes read from a single source before conversion.
const MAX_SOURCE_BYTES: usize = 256 * 1024;

/// Fetch timeout per source.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches one source's cleaned plain text.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch a source URL and return its cleaned text.
    async fn fetch(&self, url: &str) -> Result<String, CacheError>;
}

/// HTTP source fetcher that converts HTML bodies to plain text.
pub struct HttpSourceFetcher {
    client: reqwest::Client,
}

impl HttpSourceFetcher {
    /// Create a new fetcher with a bounded per-request timeout.
    pub fn new() -> Result<Self, CacheError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CacheError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CacheError> {
        debug!(%url, "Fetching reference source");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(true);

        let body = response
            .text()
            .await
            .map_err(|e| CacheError::Fetch(e.to_string()))?;

        let body = truncate_utf8(&body, MAX_SOURCE_BYTES);

        let text = if is_html {
            html2text::from_read(body.as_bytes(), 80)
                .map_err(|e| CacheError::Conversion(e.to_string()))?
        } else {
            body
        };

        Ok(collapse_whitespace(&text))
    }
}

/// Collapse runs of whitespace (including newlines from the HTML
/// conversion) into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to a byte bound without splitting a UTF-8 character.
fn truncate_utf8(input: &str, max_bytes: usize) -> String {
    if input.len() <= max_bytes {
        return input.to_string();
    }

    let mut idx = max_bytes.min(input.len());
    while idx > 0 && !input.is_char_boundary(idx) {
        idx -= 1;
    }

    input[..idx].to_string()
}
