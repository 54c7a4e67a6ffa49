//! Traits for the completion backend and the optional message lookup.

use async_trait::async_trait;

use crate::error::DraftError;
use crate::settings::Settings;

/// Everything a completion backend needs to ground one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    /// Plaintext of the message being replied to.
    pub email_context: String,
    /// Reference content the reply must be grounded in.
    pub reference_text: String,
    /// Tone directive.
    pub tone: String,
    /// Used verbatim when the reference content has no relevant answer.
    pub fallback_message: String,
}

/// A backend that turns grounded input into reply text.
///
/// Settings are passed per call because they are re-read on every draft
/// request; implementations must not cache the credential.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Generate a reply draft for the given input.
    async fn generate(
        &self,
        settings: &Settings,
        input: GenerationInput,
    ) -> Result<String, DraftError>;

    /// Exercise the same call path with a trivial fixed prompt, for
    /// credential and connectivity verification.
    async fn test_connection(&self, settings: &Settings) -> Result<String, DraftError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// An authenticated lookup of a conversation's most recent inbound body.
#[async_trait]
pub trait ContextLookup: Send + Sync {
    /// Fetch the plaintext body of the newest non-outgoing message in the
    /// given thread.
    async fn thread_context(&self, thread_id: &str) -> Result<String, DraftError>;
}

/// A lookup that is never available.
///
/// Used when the rich-context path is not wired up; the orchestrator then
/// always drafts from the page-supplied context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContextLookup;

#[async_trait]
impl ContextLookup for NoContextLookup {
    async fn thread_context(&self, _thread_id: &str) -> Result<String, DraftError> {
        Err(DraftError::ContextUnavailable(
            "no message lookup configured".to_string(),
        ))
    }
}
