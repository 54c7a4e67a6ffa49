//! The per-page agent loop.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use draft_core::{
    AgentRequest, AgentResponse, DraftRequest, Envelope, RequestSender, ResponseSender,
    SettingsStore,
};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::control::placement_for;
use crate::driver::{ControlState, ElementHandle, PageDriver, PageEvent, Toast};
use crate::surface::{current_thread_id, extract_last_inbound_message, locate_compose_surface};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Timing knobs for the agent loop.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Quiet period after a burst of page mutations before rescanning.
    pub debounce: Duration,
    /// Wait after a navigation before rebuilding against the new page.
    pub settle_delay: Duration,
    /// How long a toast stays visible.
    pub toast_duration: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

/// Whether a compose surface is currently tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Absent,
    Present(ElementHandle),
}

/// Watches one page for a compose surface, injects the action control,
/// and turns clicks into draft requests.
///
/// The agent owns no credential and never talks to the network; every
/// request goes through the channel to the orchestrator, and the reply
/// comes back on the agent's private response channel.
pub struct PageAgent<D: PageDriver> {
    driver: D,
    settings: Arc<dyn SettingsStore>,
    requests: RequestSender,
    reply_tx: ResponseSender,
    reply_rx: Option<mpsc::Receiver<AgentResponse>>,
    config: AgentConfig,
    surface: SurfaceState,
    location: String,
    in_flight: bool,
    rescan_at: Option<Instant>,
    settle_at: Option<Instant>,
    toast_clear_at: Option<Instant>,
}

impl<D: PageDriver> PageAgent<D> {
    /// Create an agent for one page, sending requests to the given channel.
    pub fn new(driver: D, settings: Arc<dyn SettingsStore>, requests: RequestSender) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel(16);
        Self {
            driver,
            settings,
            requests,
            reply_tx,
            reply_rx: Some(reply_rx),
            config: AgentConfig::default(),
            surface: SurfaceState::Absent,
            location: String::new(),
            in_flight: false,
            rescan_at: None,
            settle_at: None,
            toast_clear_at: None,
        }
    }

    /// Override the timing configuration.
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Run until the event channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<PageEvent>) {
        let Some(mut replies) = self.reply_rx.take() else {
            return;
        };

        self.location = self.driver.location();
        self.sync_surface();
        info!(location = %self.location, "Page agent started");

        loop {
            tokio::select! {
                maybe = events.recv() => match maybe {
                    Some(PageEvent::Mutation) => {
                        // First mutation of a burst arms the timer; the
                        // rest of the burst rides on it.
                        if self.rescan_at.is_none() {
                            self.rescan_at = Some(Instant::now() + self.config.debounce);
                        }
                    }
                    Some(PageEvent::ActionClicked) => self.request_draft().await,
                    None => break,
                },
                Some(response) = replies.recv() => self.on_response(response),
                _ = deadline(self.rescan_at) => {
                    self.rescan_at = None;
                    self.check_page();
                }
                _ = deadline(self.settle_at) => {
                    self.settle_at = None;
                    self.sync_surface();
                }
                _ = deadline(self.toast_clear_at) => {
                    self.toast_clear_at = None;
                    self.driver.render_toast(None);
                }
            }
        }

        debug!("Event channel closed, page agent stopping");
    }

    /// React to a settled burst of mutations.
    fn check_page(&mut self) {
        let location = self.driver.location();
        if location != self.location {
            info!(from = %self.location, to = %location, "Navigation detected");
            self.location = location;
            if let SurfaceState::Present(_) = self.surface {
                self.surface = SurfaceState::Absent;
                self.render_control(ControlState::Hidden);
            }
            // Let the new view finish rendering before rebuilding.
            self.settle_at = Some(Instant::now() + self.config.settle_delay);
            return;
        }
        self.sync_surface();
    }

    /// Reconcile the tracked surface with what the page currently shows.
    fn sync_surface(&mut self) {
        let found = locate_compose_surface(&self.driver);
        match (self.surface, found) {
            (SurfaceState::Absent, Some(handle)) => {
                self.surface = SurfaceState::Present(handle);
                let state = if self.in_flight {
                    ControlState::Busy
                } else {
                    ControlState::Idle
                };
                self.render_control(state);
            }
            (SurfaceState::Present(_), None) => {
                self.surface = SurfaceState::Absent;
                self.render_control(ControlState::Hidden);
            }
            (SurfaceState::Present(old), Some(new)) if old != new => {
                self.surface = SurfaceState::Present(new);
            }
            _ => {}
        }
    }

    async fn request_draft(&mut self) {
        if self.in_flight {
            self.toast(Toast::info("Already processing a request"));
            return;
        }

        let Some(surface) = locate_compose_surface(&self.driver) else {
            self.toast(Toast::error("No compose area found"));
            return;
        };
        self.surface = SurfaceState::Present(surface);

        let Some(context) = extract_last_inbound_message(&self.driver) else {
            self.toast(Toast::error("No message found to reply to"));
            return;
        };

        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings: {}", e);
                self.toast(Toast::error(e.to_string()));
                return;
            }
        };

        if !settings.has_api_key() {
            self.toast(Toast::error("API key not configured"));
            return;
        }
        if settings.tone.trim().is_empty() {
            self.toast(Toast::error("Tone is not configured"));
            return;
        }
        if settings.fallback_message.trim().is_empty() {
            self.toast(Toast::error("Fallback message is not configured"));
            return;
        }

        let thread_id = if settings.use_rich_context_api {
            current_thread_id(&self.driver)
        } else {
            None
        };

        let request = DraftRequest::from_settings(context, &settings, thread_id);

        self.in_flight = true;
        self.render_control(ControlState::Busy);

        let envelope = Envelope {
            request: AgentRequest::Draft(request),
            reply: self.reply_tx.clone(),
        };
        if self.requests.send(envelope).await.is_err() {
            warn!("Request channel closed, draft request dropped");
            self.finish_request();
            self.toast(Toast::error("Drafting service is not available"));
        }
    }

    fn on_response(&mut self, response: AgentResponse) {
        self.finish_request();
        match response {
            AgentResponse::Draft { draft } => self.insert_draft(&draft),
            AgentResponse::DraftError { error } => {
                self.toast(Toast::error(error));
            }
            other => debug!("Ignoring unexpected response: {:?}", other),
        }
    }

    fn finish_request(&mut self) {
        self.in_flight = false;
        let state = match self.surface {
            SurfaceState::Present(_) => ControlState::Idle,
            SurfaceState::Absent => ControlState::Hidden,
        };
        self.render_control(state);
    }

    fn insert_draft(&mut self, draft: &str) {
        // The surface may have been torn down while the draft was in
        // flight; re-acquire rather than trust the stored handle.
        let Some(surface) = locate_compose_surface(&self.driver) else {
            self.surface = SurfaceState::Absent;
            self.toast(Toast::error("Compose area is no longer available"));
            return;
        };
        self.surface = SurfaceState::Present(surface);

        self.driver.clear_content(surface);
        if !self.driver.exec_insert_text(surface, draft)
            && !self.driver.insert_at_selection(surface, draft)
        {
            self.driver.append_text(surface, draft);
        }
        self.toast(Toast::success("Draft inserted"));
    }

    fn render_control(&self, state: ControlState) {
        self.driver
            .render_control(state, placement_for(self.driver.viewport()));
    }

    fn toast(&mut self, toast: Toast) {
        self.driver.render_toast(Some(toast));
        self.toast_clear_at = Some(Instant::now() + self.config.toast_duration);
    }
}

async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => future::pending().await,
    }
}
