//! Core traits and types for the reply-drafting components.
//!
//! This crate provides the shared contract between the page-side agent and
//! the privileged orchestrator. It defines:
//!
//! - [`Settings`] / [`SettingsStore`] - The user configuration record and
//!   the store it is read from on every draft request
//! - [`DraftRequest`] / [`DraftResult`] - The transient request/response pair
//!   for one drafting round trip
//! - [`AgentRequest`] / [`AgentResponse`] - The message protocol between the
//!   page context and the privileged context
//! - [`DraftGenerator`] / [`ContextLookup`] - Traits for the completion
//!   backend and the optional authenticated message lookup
//! - [`DraftError`] - Error taxonomy for drafting operations
//!
//! # Example
//!
//! ```rust
//! use draft_core::{DraftError, DraftGenerator, GenerationInput, Settings};
//! use async_trait::async_trait;
//!
//! struct CannedGenerator;
//!
//! #[async_trait]
//! impl DraftGenerator for CannedGenerator {
//!     async fn generate(
//!         &self,
//!         _settings: &Settings,
//!         _input: GenerationInput,
//!     ) -> Result<String, DraftError> {
//!         Ok("Thanks for reaching out!".to_string())
//!     }
//!
//!     async fn test_connection(&self, _settings: &Settings) -> Result<String, DraftError> {
//!         Ok("ok".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedGenerator"
//!     }
//! }
//! ```

mod error;
mod generator;
mod protocol;
mod request;
mod settings;

pub use error::DraftError;
pub use generator::{ContextLookup, DraftGenerator, GenerationInput, NoContextLookup};
pub use protocol::{AgentRequest, AgentResponse, Envelope, RequestSender, ResponseSender};
pub use request::{DraftRequest, DraftResult};
pub use settings::{MemorySettingsStore, Provider, Settings, SettingsStore};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
