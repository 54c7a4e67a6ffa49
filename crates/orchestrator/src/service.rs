//! The orchestrator service.

use std::sync::Arc;
use std::time::Duration;

use content_cache::ContentSourceCache;
use draft_core::{
    AgentRequest, AgentResponse, ContextLookup, DraftError, DraftGenerator, DraftRequest,
    DraftResult, GenerationInput, SettingsStore,
};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::sink::ResponseSink;

/// Default deadline for one completion call.
const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for the optional rich-context lookup.
const DEFAULT_CONTEXT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`OrchestratorService`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Deadline for one completion call. A call that exceeds it fails with
    /// a distinct timeout error instead of leaving the page's action
    /// control disabled indefinitely.
    pub completion_timeout: Duration,

    /// Deadline for the optional rich-context lookup.
    pub context_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            context_timeout: DEFAULT_CONTEXT_TIMEOUT,
        }
    }
}

/// Privileged mediator holding the credential, coordinating content
/// acquisition and completion calls, independent of any single page.
pub struct OrchestratorService<G: DraftGenerator, L: ContextLookup> {
    settings: Arc<dyn SettingsStore>,
    cache: Arc<ContentSourceCache>,
    generator: G,
    context_lookup: Option<L>,
    config: OrchestratorConfig,
}

impl<G: DraftGenerator, L: ContextLookup> OrchestratorService<G, L> {
    /// Create a service with the given components.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        cache: Arc<ContentSourceCache>,
        generator: G,
        context_lookup: Option<L>,
    ) -> Self {
        Self {
            settings,
            cache,
            generator,
            context_lookup,
            config: OrchestratorConfig::default(),
        }
    }

    /// Override the timeout configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Process one request and push exactly one response to the sink.
    ///
    /// Internal failures are terminated here; nothing propagates except a
    /// delivery failure on the sink itself.
    pub async fn handle(
        &self,
        request: AgentRequest,
        sink: &impl ResponseSink,
    ) -> Result<(), OrchestratorError> {
        match request {
            AgentRequest::Draft(draft_request) => {
                let result = self.handle_draft(draft_request).await;
                sink.push(result.into()).await
            }

            AgentRequest::FetchContext { thread_id } => {
                let response = match self.fetch_context(&thread_id).await {
                    Ok(context) => AgentResponse::Context { context },
                    Err(e) => AgentResponse::ContextError {
                        error: e.to_string(),
                    },
                };
                sink.push(response).await
            }

            AgentRequest::RefreshSiteCache => {
                let response = match self.refresh_cache().await {
                    Ok(message) => AgentResponse::CacheRefreshed {
                        success: true,
                        message,
                    },
                    Err(e) => AgentResponse::CacheRefreshed {
                        success: false,
                        message: e.to_string(),
                    },
                };
                sink.push(response).await
            }

            AgentRequest::TestCompletion => {
                let response = match self.test_completion().await {
                    Ok(text) => AgentResponse::TestResult {
                        success: true,
                        response: text,
                    },
                    Err(e) => AgentResponse::TestError {
                        error: e.to_string(),
                    },
                };
                sink.push(response).await
            }
        }
    }

    /// Produce a draft for one request.
    pub async fn handle_draft(&self, request: DraftRequest) -> DraftResult {
        match self.draft(request).await {
            Ok(draft) => DraftResult::success(draft),
            Err(e) => {
                warn!("Draft request failed: {}", e);
                DraftResult::failure(e.to_string())
            }
        }
    }

    async fn draft(&self, request: DraftRequest) -> Result<String, DraftError> {
        let settings = self.settings.load().await?;

        if !settings.has_api_key() {
            return Err(DraftError::MissingApiKey);
        }

        let email_context = self.resolve_context(&request).await;
        let reference_text = self.cache.get(&request.reference_sources, false).await;

        info!(
            context_chars = email_context.len(),
            reference_chars = reference_text.len(),
            "Generating draft"
        );

        let input = GenerationInput {
            email_context,
            reference_text,
            tone: request.tone,
            fallback_message: request.fallback_message,
        };

        let draft = match timeout(
            self.config.completion_timeout,
            self.generator.generate(&settings, input),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(DraftError::Timeout(self.config.completion_timeout)),
        };

        let draft = draft.trim().to_string();
        if draft.is_empty() {
            return Err(DraftError::EmptyCompletion);
        }
        Ok(draft)
    }

    /// Resolve the email context, preferring the authenticated lookup when
    /// enabled and falling back silently to the page-supplied text on any
    /// failure of that lookup.
    async fn resolve_context(&self, request: &DraftRequest) -> String {
        if !request.use_rich_context_api {
            return request.email_context.clone();
        }

        let (Some(lookup), Some(thread_id)) =
            (self.context_lookup.as_ref(), request.thread_id.as_deref())
        else {
            return request.email_context.clone();
        };

        match timeout(self.config.context_timeout, lookup.thread_context(thread_id)).await {
            Ok(Ok(rich)) if !rich.trim().is_empty() => {
                debug!(chars = rich.len(), "Using rich context from message store");
                rich
            }
            Ok(Ok(_)) => {
                debug!("Rich context was empty, using page context");
                request.email_context.clone()
            }
            Ok(Err(e)) => {
                // The optional path must never abort the request.
                debug!("Rich context lookup failed, using page context: {}", e);
                request.email_context.clone()
            }
            Err(_) => {
                debug!("Rich context lookup timed out, using page context");
                request.email_context.clone()
            }
        }
    }

    async fn fetch_context(&self, thread_id: &str) -> Result<String, DraftError> {
        let lookup = self.context_lookup.as_ref().ok_or_else(|| {
            DraftError::ContextUnavailable("no message lookup configured".to_string())
        })?;

        match timeout(self.config.context_timeout, lookup.thread_context(thread_id)).await {
            Ok(result) => result,
            Err(_) => Err(DraftError::ContextUnavailable(format!(
                "lookup timed out after {:?}",
                self.config.context_timeout
            ))),
        }
    }

    async fn refresh_cache(&self) -> Result<String, DraftError> {
        let settings = self.settings.load().await?;
        let text = self.cache.get(&settings.reference_sources, true).await;
        Ok(format!("refreshed {} characters of reference content", text.len()))
    }

    async fn test_completion(&self) -> Result<String, DraftError> {
        let settings = self.settings.load().await?;

        if !settings.has_api_key() {
            return Err(DraftError::MissingApiKey);
        }

        match timeout(
            self.config.completion_timeout,
            self.generator.test_connection(&settings),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DraftError::Timeout(self.config.completion_timeout)),
        }
    }
}
