//! Seam between the agent and the page it lives in.

/// Opaque handle to one element on the page.
///
/// Handles are only meaningful to the driver that produced them and may go
/// stale when the page mutates; callers re-query rather than hold on to
/// them across navigations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

/// Events the host page delivers to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The page's subtree changed. Delivered in bursts during rendering.
    Mutation,
    /// The user clicked the injected action control.
    ActionClicked,
}

/// Visible states of the injected action control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// No compose surface is present; the control is removed.
    Hidden,
    /// A compose surface is present and the control is clickable.
    Idle,
    /// A draft request is in flight; the control shows progress and
    /// ignores clicks.
    Busy,
}

/// Where the action control sits, in pixels from the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPlacement {
    pub right: u32,
    pub bottom: u32,
}

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient notification shown near the action control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}

/// Access to the page the agent runs in.
///
/// Implementations wrap whatever renders the page; the agent stays
/// agnostic of it. All operations are synchronous queries or fire-and-
/// forget commands against the current page state.
pub trait PageDriver: Send + Sync {
    /// All elements matching the selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementHandle>;

    /// Whether the element currently takes up layout space.
    fn is_visible(&self, element: ElementHandle) -> bool;

    /// The element's inner markup. Empty for stale handles.
    fn inner_html(&self, element: ElementHandle) -> String;

    /// An attribute value, if present.
    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String>;

    /// The page's current address, used to detect navigation.
    fn location(&self) -> String;

    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;

    /// Render the action control in the given state and position.
    fn render_control(&self, state: ControlState, placement: ControlPlacement);

    /// Show a toast, or clear the current one with `None`.
    fn render_toast(&self, toast: Option<Toast>);

    /// Remove all content from an editable element.
    fn clear_content(&self, element: ElementHandle);

    /// Insert text through the page's native editing command, returning
    /// whether the command was honored.
    fn exec_insert_text(&self, element: ElementHandle, text: &str) -> bool;

    /// Insert text at the current selection inside the element, returning
    /// whether a selection was available.
    fn insert_at_selection(&self, element: ElementHandle, text: &str) -> bool;

    /// Append text to the element's content. Always succeeds.
    fn append_text(&self, element: ElementHandle, text: &str);
}

impl<D: PageDriver + ?Sized> PageDriver for std::sync::Arc<D> {
    fn query_all(&self, selector: &str) -> Vec<ElementHandle> {
        (**self).query_all(selector)
    }

    fn is_visible(&self, element: ElementHandle) -> bool {
        (**self).is_visible(element)
    }

    fn inner_html(&self, element: ElementHandle) -> String {
        (**self).inner_html(element)
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        (**self).attribute(element, name)
    }

    fn location(&self) -> String {
        (**self).location()
    }

    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn render_control(&self, state: ControlState, placement: ControlPlacement) {
        (**self).render_control(state, placement)
    }

    fn render_toast(&self, toast: Option<Toast>) {
        (**self).render_toast(toast)
    }

    fn clear_content(&self, element: ElementHandle) {
        (**self).clear_content(element)
    }

    fn exec_insert_text(&self, element: ElementHandle, text: &str) -> bool {
        (**self).exec_insert_text(element, text)
    }

    fn insert_at_selection(&self, element: ElementHandle, text: &str) -> bool {
        (**self).insert_at_selection(element, text)
    }

    fn append_text(&self, element: ElementHandle, text: &str) {
        (**self).append_text(element, text)
    }
}
