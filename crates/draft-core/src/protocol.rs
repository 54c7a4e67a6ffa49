//! Message protocol between the page context and the privileged context.
//!
//! Each request produces exactly one response. The page agent depends only
//! on this contract; it never touches the orchestrator's components
//! directly, and the credential never crosses this boundary.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::request::{DraftRequest, DraftResult};

/// Requests the page agent can send to the privileged context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentRequest {
    /// Produce a reply draft for the extracted page context.
    #[serde(rename = "DRAFT_REQUEST")]
    Draft(DraftRequest),

    /// Fetch the rich context for a thread. Unlike the lookup inside a
    /// draft request, failures here are surfaced.
    #[serde(rename = "FETCH_CONTEXT")]
    FetchContext { thread_id: String },

    /// Force a refresh of the cached reference content.
    #[serde(rename = "REFRESH_SITE_CACHE")]
    RefreshSiteCache,

    /// Exercise the completion call path with a trivial prompt.
    #[serde(rename = "TEST_COMPLETION")]
    TestCompletion,
}

/// Responses pushed back to the originating page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentResponse {
    /// A generated draft.
    #[serde(rename = "DRAFT_RESPONSE")]
    Draft { draft: String },

    /// A drafting failure, as a human-readable message.
    #[serde(rename = "DRAFT_ERROR")]
    DraftError { error: String },

    /// The rich context for an explicit fetch request.
    #[serde(rename = "CONTEXT_RESPONSE")]
    Context { context: String },

    /// Failure of an explicit context fetch.
    #[serde(rename = "CONTEXT_ERROR")]
    ContextError { error: String },

    /// Result of a forced cache refresh.
    #[serde(rename = "CACHE_REFRESHED")]
    CacheRefreshed { success: bool, message: String },

    /// Result of a connectivity test.
    #[serde(rename = "TEST_RESULT")]
    TestResult { success: bool, response: String },

    /// Failure of a connectivity test.
    #[serde(rename = "TEST_ERROR")]
    TestError { error: String },
}

impl From<DraftResult> for AgentResponse {
    fn from(result: DraftResult) -> Self {
        match result {
            DraftResult::Success { draft } => AgentResponse::Draft { draft },
            DraftResult::Failure { error } => AgentResponse::DraftError { error },
        }
    }
}

/// One request plus the channel its single response is pushed to.
#[derive(Debug)]
pub struct Envelope {
    /// The request to process.
    pub request: AgentRequest,
    /// Where the originating page receives its response.
    pub reply: ResponseSender,
}

/// Sending half of a page agent's dispatch channel.
pub type RequestSender = mpsc::Sender<Envelope>;

/// Sending half of a page agent's response inbox.
pub type ResponseSender = mpsc::Sender<AgentResponse>;
