//! Provider-specific chat-completion client.
//!
//! Builds grounded prompts, issues one HTTP request to the configured
//! provider's chat-completion endpoint, and parses the response into plain
//! reply text. Provider selection changes only the request envelope and the
//! auth header scheme; the prompt content itself is provider-agnostic.

mod api_types;
mod client;
mod config;
mod prompt;
mod provider;

pub use client::CompletionClient;
pub use config::CompletionConfig;
pub use prompt::{build_user_prompt, GROUNDING_SYSTEM_PROMPT, TEST_PROMPT};
