//! The completion client.

use async_trait::async_trait;
use draft_core::{DraftError, DraftGenerator, GenerationInput, Settings};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api_types::ApiError;
use crate::config::CompletionConfig;
use crate::prompt::{build_user_prompt, GROUNDING_SYSTEM_PROMPT, TEST_PROMPT};
use crate::provider::ProviderEnvelope;

/// Client for the hosted chat-completion endpoints.
///
/// Holds no credential; the key and provider selection arrive with the
/// settings on every call, since settings are re-read per draft request.
pub struct CompletionClient {
    http: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CompletionConfig) -> Result<Self, DraftError> {
        let http = Client::builder()
            .build()
            .map_err(|e| DraftError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Result<Self, DraftError> {
        Self::new(CompletionConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Issue one completion request and return the first choice's text.
    async fn complete(
        &self,
        settings: &Settings,
        user_prompt: &str,
    ) -> Result<String, DraftError> {
        if !settings.has_api_key() {
            return Err(DraftError::MissingApiKey);
        }

        let envelope = settings.provider.build_request(
            &self.config,
            settings.api_key.trim(),
            GROUNDING_SYSTEM_PROMPT,
            user_prompt,
        );

        debug!(provider = ?settings.provider, url = %envelope.url, "Sending completion request");

        let mut request = self.http.post(&envelope.url).json(&envelope.body);
        for (name, value) in &envelope.headers {
            request = request.header(*name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DraftError::Network(format!("failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Both providers wrap failures in an {"error": {"message"}} body.
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(DraftError::Network(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(DraftError::Network(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DraftError::MalformedResponse(format!("failed to parse body: {}", e)))?;

        settings.provider.extract_text(&body)
    }
}

#[async_trait]
impl DraftGenerator for CompletionClient {
    async fn generate(
        &self,
        settings: &Settings,
        input: GenerationInput,
    ) -> Result<String, DraftError> {
        let user_prompt = build_user_prompt(
            &input.email_context,
            &input.reference_text,
            &input.tone,
            &input.fallback_message,
        );

        let draft = self.complete(settings, &user_prompt).await?;
        debug!(chars = draft.len(), "Generated draft");
        Ok(draft)
    }

    async fn test_connection(&self, settings: &Settings) -> Result<String, DraftError> {
        match self.complete(settings, TEST_PROMPT).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("Connection test failed: {}", e);
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "CompletionClient"
    }
}
