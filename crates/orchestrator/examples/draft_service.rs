//! Full drafting stack wired from environment variables.
//!
//! Builds the completion client, reference-content cache, optional message
//! lookup, and router, then drives one draft request through the channel
//! pair a page agent would use.
//!
//! Run with: cargo run -p orchestrator --example draft_service
//!
//! Configuration via .env file or environment variables:
//!   DRAFT_API_KEY           - Completion provider credential (required)
//!   DRAFT_PROVIDER          - "openai" or "anthropic" (default: openai)
//!   DRAFT_TONE              - Reply tone directive
//!   DRAFT_FALLBACK_MESSAGE  - Fallback reply text
//!   DRAFT_REFERENCE_SOURCES - Newline-delimited source URLs or static text
//!   DRAFT_USE_RICH_CONTEXT  - "true" to enable the message lookup
//!   MAIL_ACCESS_TOKEN       - OAuth token for the message lookup (optional)

use std::sync::Arc;

use completion_client::CompletionClient;
use content_cache::{ContentSourceCache, HttpSourceFetcher, MemoryCacheStore};
use draft_core::{
    AgentRequest, DraftGenerator, DraftRequest, Envelope, MemorySettingsStore, Settings,
};
use mail_store::{MailStoreClient, MailStoreConfig, StaticToken};
use orchestrator::{MessageRouter, OrchestratorService};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (searches current dir and parents)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let settings = Settings::from_env()?;
    println!("Provider: {:?}", settings.provider);
    println!("Tone: {}", settings.tone);

    let generator = CompletionClient::from_env()?;
    println!("Using generator: {}", generator.name());

    let cache = Arc::new(ContentSourceCache::new(
        Arc::new(MemoryCacheStore::new()),
        Arc::new(HttpSourceFetcher::new()?),
    ));

    let lookup = match std::env::var("MAIL_ACCESS_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            println!("Message lookup enabled");
            Some(MailStoreClient::new(
                MailStoreConfig::default(),
                Arc::new(StaticToken(token)),
            )?)
        }
        _ => {
            println!("MAIL_ACCESS_TOKEN not set, using page context only");
            None
        }
    };

    let request = DraftRequest::from_settings(
        "Hi, could you tell me when the annual event takes place this year?",
        &settings,
        None,
    );

    let service = OrchestratorService::new(
        Arc::new(MemorySettingsStore::with_settings(settings)),
        cache,
        generator,
        lookup,
    );
    let router = MessageRouter::new(Arc::new(service));

    let (request_tx, request_rx) = mpsc::channel(16);
    let (reply_tx, mut reply_rx) = mpsc::channel(16);

    tokio::spawn(async move { router.run(request_rx).await });

    println!("Sending draft request...");
    request_tx
        .send(Envelope {
            request: AgentRequest::Draft(request),
            reply: reply_tx,
        })
        .await?;

    match reply_rx.recv().await {
        Some(response) => println!("Response: {:?}", response),
        None => println!("Router dropped the reply channel"),
    }

    Ok(())
}
