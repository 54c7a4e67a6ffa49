//! A scripted in-memory page, for tests and demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::driver::{
    ControlPlacement, ControlState, ElementHandle, PageDriver, Toast, Viewport,
};

#[derive(Debug, Clone)]
struct ScriptedElement {
    handle: ElementHandle,
    selector: String,
    html: String,
    visible: bool,
    attributes: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct PageState {
    location: String,
    viewport: Option<Viewport>,
    elements: Vec<ScriptedElement>,
    next_handle: u64,
    controls: Vec<(ControlState, ControlPlacement)>,
    toasts: Vec<Option<Toast>>,
    cleared: Vec<ElementHandle>,
    insertions: Vec<(ElementHandle, String)>,
    exec_insert_ok: bool,
    selection_insert_ok: bool,
}

/// Page driver whose content and behavior are scripted up front.
///
/// Elements are registered against the exact selector they should match,
/// and every command the agent issues is recorded for later inspection.
#[derive(Debug)]
pub struct ScriptedPage {
    state: Mutex<PageState>,
}

impl Default for ScriptedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                location: "https://mail.example.com/#inbox".to_string(),
                exec_insert_ok: true,
                selection_insert_ok: true,
                ..PageState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        // A panic mid-assertion in one test thread must not wedge the rest.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register an element that matches exactly the given selector.
    pub fn add_element(&self, selector: &str, html: &str, visible: bool) -> ElementHandle {
        let mut state = self.state();
        state.next_handle += 1;
        let handle = ElementHandle(state.next_handle);
        state.elements.push(ScriptedElement {
            handle,
            selector: selector.to_string(),
            html: html.to_string(),
            visible,
            attributes: HashMap::new(),
        });
        handle
    }

    /// Remove an element, invalidating its handle.
    pub fn remove_element(&self, handle: ElementHandle) {
        self.state().elements.retain(|e| e.handle != handle);
    }

    pub fn set_attribute(&self, handle: ElementHandle, name: &str, value: &str) {
        let mut state = self.state();
        if let Some(element) = state.elements.iter_mut().find(|e| e.handle == handle) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_location(&self, location: &str) {
        self.state().location = location.to_string();
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.state().viewport = Some(Viewport { width, height });
    }

    /// Script whether the native insert command is honored.
    pub fn set_exec_insert_ok(&self, ok: bool) {
        self.state().exec_insert_ok = ok;
    }

    /// Script whether a selection is available for insertion.
    pub fn set_selection_insert_ok(&self, ok: bool) {
        self.state().selection_insert_ok = ok;
    }

    /// Every control render issued, oldest first.
    pub fn control_renders(&self) -> Vec<(ControlState, ControlPlacement)> {
        self.state().controls.clone()
    }

    /// The most recent control state, if any was rendered.
    pub fn last_control(&self) -> Option<(ControlState, ControlPlacement)> {
        self.state().controls.last().copied()
    }

    /// Every toast command issued, including clears.
    pub fn toasts(&self) -> Vec<Option<Toast>> {
        self.state().toasts.clone()
    }

    /// The messages of all shown toasts, skipping clears.
    pub fn toast_messages(&self) -> Vec<String> {
        self.state()
            .toasts
            .iter()
            .flatten()
            .map(|t| t.message.clone())
            .collect()
    }

    /// Elements whose content was cleared, in order.
    pub fn cleared(&self) -> Vec<ElementHandle> {
        self.state().cleared.clone()
    }

    /// Every text insertion, with its target element.
    pub fn insertions(&self) -> Vec<(ElementHandle, String)> {
        self.state().insertions.clone()
    }
}

impl PageDriver for ScriptedPage {
    fn query_all(&self, selector: &str) -> Vec<ElementHandle> {
        self.state()
            .elements
            .iter()
            .filter(|e| e.selector == selector)
            .map(|e| e.handle)
            .collect()
    }

    fn is_visible(&self, element: ElementHandle) -> bool {
        self.state()
            .elements
            .iter()
            .any(|e| e.handle == element && e.visible)
    }

    fn inner_html(&self, element: ElementHandle) -> String {
        self.state()
            .elements
            .iter()
            .find(|e| e.handle == element)
            .map(|e| e.html.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.state()
            .elements
            .iter()
            .find(|e| e.handle == element)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn location(&self) -> String {
        self.state().location.clone()
    }

    fn viewport(&self) -> Viewport {
        self.state().viewport.unwrap_or(Viewport {
            width: 1280,
            height: 800,
        })
    }

    fn render_control(&self, state: ControlState, placement: ControlPlacement) {
        self.state().controls.push((state, placement));
    }

    fn render_toast(&self, toast: Option<Toast>) {
        self.state().toasts.push(toast);
    }

    fn clear_content(&self, element: ElementHandle) {
        let mut state = self.state();
        if let Some(e) = state.elements.iter_mut().find(|e| e.handle == element) {
            e.html.clear();
        }
        state.cleared.push(element);
    }

    fn exec_insert_text(&self, element: ElementHandle, text: &str) -> bool {
        let mut state = self.state();
        if !state.exec_insert_ok {
            return false;
        }
        state.insertions.push((element, text.to_string()));
        true
    }

    fn insert_at_selection(&self, element: ElementHandle, text: &str) -> bool {
        let mut state = self.state();
        if !state.selection_insert_ok {
            return false;
        }
        state.insertions.push((element, text.to_string()));
        true
    }

    fn append_text(&self, element: ElementHandle, text: &str) {
        self.state().insertions.push((element, text.to_string()));
    }
}
