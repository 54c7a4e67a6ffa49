//! Locating the compose surface and extracting conversation text.

use tracing::debug;

use crate::driver::{ElementHandle, PageDriver};

/// Compose-area selectors, most specific first. The webmail UI renders
/// several editable containers; only the first visible match is the reply
/// surface.
pub const COMPOSE_SELECTORS: &[&str] = &[
    "div[aria-label='Message Body']",
    "div[role='textbox'][contenteditable='true']",
    "div[contenteditable='true']",
    "div.editable[contenteditable='true']",
    "div[g_editable='true']",
];

/// Message-body selectors, most specific first. Conversation views render
/// each message body in one of these containers.
pub const MESSAGE_SELECTORS: &[&str] = &[
    "div[data-message-id] div.a3s",
    "div.a3s.aiL",
    "div.ii.gt",
    "div[role='listitem'] div.a3s",
    "div[role='listitem']",
];

/// Carrier of the conversation identifier in thread views.
pub const THREAD_ID_SELECTOR: &str = "[data-legacy-thread-id]";
const THREAD_ID_ATTRIBUTE: &str = "data-legacy-thread-id";

/// Find the reply compose surface, if one is open.
///
/// Selectors are tried in priority order; within one selector the first
/// visible match wins.
pub fn locate_compose_surface(driver: &impl PageDriver) -> Option<ElementHandle> {
    for selector in COMPOSE_SELECTORS {
        for handle in driver.query_all(selector) {
            if driver.is_visible(handle) {
                debug!(selector, "Found compose surface");
                return Some(handle);
            }
        }
    }
    None
}

/// Extract the plaintext of the newest message in the open conversation.
///
/// Within one selector, matches are scanned newest-first, and the first
/// with non-empty text wins; later selectors are only consulted when an
/// earlier one matched nothing usable.
pub fn extract_last_inbound_message(driver: &impl PageDriver) -> Option<String> {
    for selector in MESSAGE_SELECTORS {
        for handle in driver.query_all(selector).into_iter().rev() {
            let text = html_to_text(&driver.inner_html(handle));
            if !text.is_empty() {
                debug!(selector, chars = text.len(), "Extracted message text");
                return Some(text);
            }
        }
    }
    None
}

/// The conversation identifier of the open thread view, if any.
pub fn current_thread_id(driver: &impl PageDriver) -> Option<String> {
    driver
        .query_all(THREAD_ID_SELECTOR)
        .into_iter()
        .find_map(|handle| driver.attribute(handle, THREAD_ID_ATTRIBUTE))
        .filter(|id| !id.is_empty())
}

/// Convert a markup fragment to collapsed plain text.
pub fn html_to_text(html: &str) -> String {
    match html2text::from_read(html.as_bytes(), 80) {
        Ok(text) => collapse_whitespace(&text),
        Err(_) => collapse_whitespace(html),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
