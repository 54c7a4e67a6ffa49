//! Channel-driven request router.

use std::sync::Arc;

use draft_core::{ContextLookup, DraftGenerator, Envelope};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::service::OrchestratorService;
use crate::sink::ChannelSink;

/// Pulls request envelopes off a channel and dispatches each to the
/// service on its own task, so a slow completion for one page never
/// blocks requests from another.
pub struct MessageRouter<G: DraftGenerator + 'static, L: ContextLookup + 'static> {
    service: Arc<OrchestratorService<G, L>>,
}

impl<G: DraftGenerator + 'static, L: ContextLookup + 'static> MessageRouter<G, L> {
    pub fn new(service: Arc<OrchestratorService<G, L>>) -> Self {
        Self { service }
    }

    /// Run until the request channel closes.
    pub async fn run(&self, mut inbox: mpsc::Receiver<Envelope>) {
        info!("Message router started");

        while let Some(envelope) = inbox.recv().await {
            debug!("Routing request");
            let service = Arc::clone(&self.service);
            let sink = ChannelSink::new(envelope.reply);
            tokio::spawn(async move {
                if let Err(e) = service.handle(envelope.request, &sink).await {
                    warn!("Failed to deliver response: {}", e);
                }
            });
        }

        info!("Request channel closed, router stopping");
    }
}
