//! Per-page agent for the reply drafting surface.
//!
//! One [`PageAgent`] runs per open webmail page. It watches the page for a
//! reply compose surface, injects a floating action control next to it,
//! and on click extracts the conversation's newest message, packages it
//! with the current settings, and ships it over a channel to the
//! orchestrator. The reply is inserted back into the compose surface.
//!
//! The page itself is reached only through the [`PageDriver`] trait;
//! [`ScriptedPage`] is an in-memory implementation for tests and demos.

mod agent;
mod control;
mod driver;
mod scripted;
mod surface;

pub use agent::{AgentConfig, PageAgent, SurfaceState};
pub use control::placement_for;
pub use driver::{
    ControlPlacement, ControlState, ElementHandle, PageDriver, PageEvent, Toast, ToastKind,
    Viewport,
};
pub use scripted::ScriptedPage;
pub use surface::{
    current_thread_id, extract_last_inbound_message, html_to_text, locate_compose_surface,
    COMPOSE_SELECTORS, MESSAGE_SELECTORS, THREAD_ID_SELECTOR,
};
