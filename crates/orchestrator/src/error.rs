//! Error types for orchestration.

use draft_core::DraftError;
use thiserror::Error;

/// Errors that can occur while routing requests and responses.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Drafting failed.
    #[error("draft error: {0}")]
    Draft(#[from] DraftError),

    /// The response could not be delivered to the originating page.
    #[error("response delivery failed: {0}")]
    SendFailed(String),
}
