//! Response delivery trait and implementations.

use async_trait::async_trait;
use draft_core::{AgentResponse, ResponseSender};

use crate::error::OrchestratorError;

/// Delivers responses back to an originating page.
///
/// Abstracted to support different transports (extension messaging,
/// channels, tests).
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Push one response to the page this sink belongs to.
    async fn push(&self, response: AgentResponse) -> Result<(), OrchestratorError>;
}

/// Sink backed by a page agent's response channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: ResponseSender,
}

impl ChannelSink {
    /// Create a sink over the given channel.
    pub fn new(sender: ResponseSender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl ResponseSink for ChannelSink {
    async fn push(&self, response: AgentResponse) -> Result<(), OrchestratorError> {
        self.sender
            .send(response)
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}

/// A sink that discards all responses, for tests.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl ResponseSink for NoOpSink {
    async fn push(&self, _response: AgentResponse) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A sink that logs all responses, for debugging.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl ResponseSink for LoggingSink {
    async fn push(&self, response: AgentResponse) -> Result<(), OrchestratorError> {
        tracing::info!("Pushing response: {:?}", response);
        Ok(())
    }
}
