//! Per-provider request envelopes and response parsing.
//!
//! Each [`Provider`] variant supplies its endpoint, auth headers, request
//! body, and response parser from a single `match` per capability. Adding a
//! provider means adding a variant and one arm to each method.

use draft_core::{DraftError, Provider};
use serde_json::{json, Value};

use crate::api_types::ChatMessage;
use crate::config::CompletionConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Everything needed to issue one completion request.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// Fully qualified endpoint URL.
    pub url: String,
    /// Auth and version headers for this provider.
    pub headers: Vec<(&'static str, String)>,
    /// JSON request body.
    pub body: Value,
}

/// Provider-specific behavior for the closed [`Provider`] set.
pub trait ProviderEnvelope {
    /// Build the request envelope for a system + user prompt pair.
    fn build_request(
        &self,
        config: &CompletionConfig,
        api_key: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> RequestEnvelope;

    /// Extract the first choice's text from a success response body.
    fn extract_text(&self, body: &Value) -> Result<String, DraftError>;
}

impl ProviderEnvelope for Provider {
    fn build_request(
        &self,
        config: &CompletionConfig,
        api_key: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> RequestEnvelope {
        match self {
            Provider::OpenAi => RequestEnvelope {
                url: format!("{}/v1/chat/completions", config.openai_api_url),
                headers: vec![("Authorization", format!("Bearer {}", api_key))],
                body: json!({
                    "model": config.openai_model,
                    "messages": [
                        ChatMessage::system(system_prompt),
                        ChatMessage::user(user_prompt),
                    ],
                    "max_tokens": config.max_tokens,
                    "temperature": config.temperature,
                }),
            },
            Provider::Anthropic => RequestEnvelope {
                url: format!("{}/v1/messages", config.anthropic_api_url),
                headers: vec![
                    ("x-api-key", api_key.to_string()),
                    ("anthropic-version", ANTHROPIC_VERSION.to_string()),
                ],
                body: json!({
                    "model": config.anthropic_model,
                    "system": system_prompt,
                    "messages": [ChatMessage::user(user_prompt)],
                    "max_tokens": config.max_tokens,
                    "temperature": config.temperature,
                }),
            },
        }
    }

    fn extract_text(&self, body: &Value) -> Result<String, DraftError> {
        let text = match self {
            Provider::OpenAi => {
                let choices = body["choices"].as_array().ok_or_else(|| {
                    DraftError::MalformedResponse("missing choices array".to_string())
                })?;
                let first = choices.first().ok_or(DraftError::EmptyCompletion)?;
                first["message"]["content"].as_str().unwrap_or_default()
            }
            Provider::Anthropic => {
                let content = body["content"].as_array().ok_or_else(|| {
                    DraftError::MalformedResponse("missing content array".to_string())
                })?;
                let first = content.first().ok_or(DraftError::EmptyCompletion)?;
                first["text"].as_str().unwrap_or_default()
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DraftError::EmptyCompletion);
        }
        Ok(trimmed.to_string())
    }
}
