//! User settings and the store they are read from.

use std::env;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::DraftError;

/// Which hosted completion provider to call.
///
/// A closed set: adding a provider means adding a variant here and teaching
/// the completion client its envelope shape, not extending string switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Parse a stored provider tag, defaulting to OpenAI for unknown values.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Provider::Anthropic,
            _ => Provider::OpenAi,
        }
    }
}

/// Default tone directive applied on first install.
pub const DEFAULT_TONE: &str = "friendly and professional";

/// Default fallback message used verbatim when no grounded answer exists.
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "I don't have that information to hand, but I'll find out and get back to you shortly.";

/// The flat settings record.
///
/// Created with defaults on first install, read on every draft request,
/// mutated only through the settings surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Secret credential for the completion provider. Required before any
    /// completion call.
    #[serde(default)]
    pub api_key: String,
    /// Completion provider selection.
    #[serde(default)]
    pub provider: Provider,
    /// Free-text style directive for generated replies.
    #[serde(default)]
    pub tone: String,
    /// Used verbatim when no grounded answer exists.
    #[serde(default)]
    pub fallback_message: String,
    /// Newline-delimited list of URLs, or a static reference text block.
    #[serde(default)]
    pub reference_sources: String,
    /// Toggles the optional authenticated message lookup.
    #[serde(default)]
    pub use_rich_context_api: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider: Provider::default(),
            tone: DEFAULT_TONE.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            reference_sources: String::new(),
            use_rich_context_api: false,
        }
    }
}

impl Settings {
    /// Whether a non-empty credential is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Create settings from environment variables.
    ///
    /// Required environment variables:
    /// - `DRAFT_API_KEY` - Completion provider credential
    ///
    /// Optional environment variables:
    /// - `DRAFT_PROVIDER` - "openai" or "anthropic" (default: openai)
    /// - `DRAFT_TONE` - Reply tone directive
    /// - `DRAFT_FALLBACK_MESSAGE` - Fallback reply text
    /// - `DRAFT_REFERENCE_SOURCES` - Newline-delimited source URLs or static text
    /// - `DRAFT_USE_RICH_CONTEXT` - "true"/"1" to enable the message lookup
    pub fn from_env() -> Result<Self, DraftError> {
        let api_key = env::var("DRAFT_API_KEY")
            .map_err(|_| DraftError::Configuration("DRAFT_API_KEY not set".to_string()))?;

        let provider = env::var("DRAFT_PROVIDER")
            .map(|v| Provider::from_tag(&v))
            .unwrap_or_default();

        let tone = env::var("DRAFT_TONE").unwrap_or_else(|_| DEFAULT_TONE.to_string());

        let fallback_message = env::var("DRAFT_FALLBACK_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_FALLBACK_MESSAGE.to_string());

        let reference_sources = env::var("DRAFT_REFERENCE_SOURCES").unwrap_or_default();

        let use_rich_context_api = env::var("DRAFT_USE_RICH_CONTEXT")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            api_key,
            provider,
            tone,
            fallback_message,
            reference_sources,
            use_rich_context_api,
        })
    }
}

/// Key-value settings store the privileged context reads on every request.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the current settings.
    async fn load(&self) -> Result<Settings, DraftError>;

    /// Replace the stored settings.
    async fn save(&self, settings: Settings) -> Result<(), DraftError>;
}

/// An in-memory settings store.
///
/// Used by tests and by embeddings that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    /// Create a store holding default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, DraftError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: Settings) -> Result<(), DraftError> {
        *self.settings.write().await = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_tag() {
        assert_eq!(Provider::from_tag("anthropic"), Provider::Anthropic);
        assert_eq!(Provider::from_tag("Anthropic "), Provider::Anthropic);
        assert_eq!(Provider::from_tag("openai"), Provider::OpenAi);
        assert_eq!(Provider::from_tag("something-else"), Provider::OpenAi);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.has_api_key());
        assert_eq!(settings.provider, Provider::OpenAi);
        assert_eq!(settings.tone, DEFAULT_TONE);
        assert!(!settings.use_rich_context_api);
    }

    #[test]
    fn test_has_api_key_ignores_whitespace() {
        let settings = Settings {
            api_key: "   ".to_string(),
            ..Default::default()
        };
        assert!(!settings.has_api_key());
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySettingsStore::new();
        let mut settings = store.load().await.unwrap();
        assert!(!settings.has_api_key());

        settings.api_key = "sk-test".to_string();
        store.save(settings).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.api_key, "sk-test");
    }
}
