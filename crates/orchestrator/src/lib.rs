//! Privileged mediator for reply drafting.
//!
//! The orchestrator holds the credential-bearing settings store, the
//! reference-content cache, the completion backend, and the optional
//! authenticated message lookup. It is constructed once with injected
//! dependencies and moved into the message router; nothing reaches it
//! through ambient global lookup. Every request it accepts is terminated
//! into exactly one response pushed back to the originating page.

mod error;
mod router;
mod service;
mod sink;

pub use error::OrchestratorError;
pub use router::MessageRouter;
pub use service::{OrchestratorConfig, OrchestratorService};
pub use sink::{ChannelSink, LoggingSink, NoOpSink, ResponseSink};
