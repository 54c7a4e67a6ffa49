//! The transient request/response pair for one drafting round trip.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A single draft request, handed by value from the page agent to the
/// orchestrator. Exists only for the duration of one round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    /// Best-effort plaintext rendition of the most recent inbound message.
    pub email_context: String,
    /// Tone directive carried from settings.
    pub tone: String,
    /// Fallback reply text carried from settings.
    pub fallback_message: String,
    /// Reference source list carried from settings.
    pub reference_sources: String,
    /// Whether the orchestrator should attempt the authenticated lookup.
    pub use_rich_context_api: bool,
    /// Conversation identifier scraped from the page, when available.
    pub thread_id: Option<String>,
}

impl DraftRequest {
    /// Build a request from the extracted page context and current settings.
    pub fn from_settings(
        email_context: impl Into<String>,
        settings: &Settings,
        thread_id: Option<String>,
    ) -> Self {
        Self {
            email_context: email_context.into(),
            tone: settings.tone.clone(),
            fallback_message: settings.fallback_message.clone(),
            reference_sources: settings.reference_sources.clone(),
            use_rich_context_api: settings.use_rich_context_api,
            thread_id,
        }
    }
}

/// Outcome of one draft request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftResult {
    /// A generated draft, ready for insertion.
    Success { draft: String },
    /// A human-readable failure message.
    Failure { error: String },
}

impl DraftResult {
    /// Create a success result.
    pub fn success(draft: impl Into<String>) -> Self {
        DraftResult::Success {
            draft: draft.into(),
        }
    }

    /// Create a failure result.
    pub fn failure(error: impl Into<String>) -> Self {
        DraftResult::Failure {
            error: error.into(),
        }
    }

    /// Whether this result carries a draft.
    pub fn is_success(&self) -> bool {
        matches!(self, DraftResult::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_carries_fields() {
        let settings = Settings {
            tone: "casual".to_string(),
            fallback_message: "ask us".to_string(),
            reference_sources: "https://example.com".to_string(),
            use_rich_context_api: true,
            ..Default::default()
        };

        let request =
            DraftRequest::from_settings("Hello there", &settings, Some("t123".to_string()));

        assert_eq!(request.email_context, "Hello there");
        assert_eq!(request.tone, "casual");
        assert_eq!(request.fallback_message, "ask us");
        assert_eq!(request.reference_sources, "https://example.com");
        assert!(request.use_rich_context_api);
        assert_eq!(request.thread_id.as_deref(), Some("t123"));
    }

    #[test]
    fn test_result_variants() {
        assert!(DraftResult::success("hi").is_success());
        assert!(!DraftResult::failure("nope").is_success());
    }
}
