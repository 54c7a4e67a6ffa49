//! Configuration for the completion client.

use std::env;

/// Configuration for [`CompletionClient`](crate::CompletionClient).
///
/// The credential and provider selection are not part of this config; they
/// arrive with the settings on every call.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// OpenAI-compatible API base URL.
    pub openai_api_url: String,

    /// Anthropic API base URL.
    pub anthropic_api_url: String,

    /// Model identifier for OpenAI requests.
    pub openai_model: String,

    /// Model identifier for Anthropic requests.
    pub anthropic_model: String,

    /// Bound on generated output length.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            openai_api_url: "https://api.openai.com".to_string(),
            anthropic_api_url: "https://api.anthropic.com".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            anthropic_model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 250,
            temperature: 0.5,
        }
    }
}

impl CompletionConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `COMPLETION_OPENAI_API_URL` (default: https://api.openai.com)
    /// - `COMPLETION_ANTHROPIC_API_URL` (default: https://api.anthropic.com)
    /// - `COMPLETION_OPENAI_MODEL` (default: gpt-4o-mini)
    /// - `COMPLETION_ANTHROPIC_MODEL` (default: claude-3-haiku-20240307)
    /// - `COMPLETION_MAX_TOKENS` (default: 250)
    /// - `COMPLETION_TEMPERATURE` (default: 0.5)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            openai_api_url: env::var("COMPLETION_OPENAI_API_URL")
                .unwrap_or(defaults.openai_api_url),
            anthropic_api_url: env::var("COMPLETION_ANTHROPIC_API_URL")
                .unwrap_or(defaults.anthropic_api_url),
            openai_model: env::var("COMPLETION_OPENAI_MODEL").unwrap_or(defaults.openai_model),
            anthropic_model: env::var("COMPLETION_ANTHROPIC_MODEL")
                .unwrap_or(defaults.anthropic_model),
            max_tokens: env::var("COMPLETION_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: env::var("COMPLETION_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
        }
    }

    /// Set the OpenAI base URL.
    pub fn with_openai_api_url(mut self, url: impl Into<String>) -> Self {
        self.openai_api_url = url.into();
        self
    }

    /// Set the Anthropic base URL.
    pub fn with_anthropic_api_url(mut self, url: impl Into<String>) -> Self {
        self.anthropic_api_url = url.into();
        self
    }

    /// Set the output-length bound.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompletionConfig::default();
        assert_eq!(config.max_tokens, 250);
        assert_eq!(config.temperature, 0.5);
        assert!(config.openai_api_url.starts_with("https://"));
    }

    #[test]
    fn test_builders() {
        let config = CompletionConfig::default()
            .with_max_tokens(100)
            .with_temperature(0.9)
            .with_openai_api_url("http://localhost:8080");
        assert_eq!(config.max_tokens, 100);
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.openai_api_url, "http://localhost:8080");
    }
}
