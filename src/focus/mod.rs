//! Outside-interaction detection
//!
//! While the result panel is open the widget listens for clicks anywhere in
//! the host; while the control is untouched it also listens for focus moving
//! elsewhere. Both listeners are process-wide resources owned by the host.
//! The widget holds them through [`ListenerHandle`]s, which detach on drop,
//! so leaving a state or disposing the widget always releases them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  attach / detach  ┌──────────────────────┐
//! │ FocusWatcher │ ────────────────▶ │ GlobalListeners impl │ (host)
//! └──────┬───────┘                   └──────────┬───────────┘
//!        │ ListenerHandle (Drop = detach)       │ GlobalEvent
//!        ▼                                      ▼
//!   panel open / touch watch  ◀──────  on_global_event()
//! ```

pub mod mock;

pub use mock::RecordingListeners;

use std::fmt;
use std::sync::Arc;

/// Kind of window-level listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer click anywhere in the host
    Click,
    /// Focus moving anywhere in the host (capturing)
    Focus,
}

/// Identifier handed out by a [`GlobalListeners`] registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Host registry of window-level listeners
pub trait GlobalListeners: Send + Sync {
    /// Start delivering events of `kind` to the widget
    fn attach(&self, kind: ListenerKind) -> ListenerId;

    /// Stop delivering events for `id`
    fn detach(&self, id: ListenerId);
}

/// An attached listener, detached when dropped
pub struct ListenerHandle {
    registry: Arc<dyn GlobalListeners>,
    id: ListenerId,
    kind: ListenerKind,
}

impl ListenerHandle {
    /// Attach a listener of `kind` on `registry`
    #[must_use]
    pub fn acquire(registry: &Arc<dyn GlobalListeners>, kind: ListenerKind) -> Self {
        let id = registry.attach(kind);
        tracing::trace!(?kind, id = id.0, "attached global listener");
        Self {
            registry: Arc::clone(registry),
            id,
            kind,
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        tracing::trace!(kind = ?self.kind, id = self.id.0, "detached global listener");
        self.registry.detach(self.id);
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Where a global event happened relative to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// Inside the widget's own element tree
    Inside,
    /// Somewhere else in the host
    Outside,
    /// Not an element at all (window, document)
    NotAnElement,
}

/// A window-level click or focus event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEvent {
    pub kind: ListenerKind,
    pub target: EventTarget,
}

impl GlobalEvent {
    /// Click outside the widget
    #[must_use]
    pub const fn outside_click() -> Self {
        Self {
            kind: ListenerKind::Click,
            target: EventTarget::Outside,
        }
    }

    /// Focus moved outside the widget
    #[must_use]
    pub const fn outside_focus() -> Self {
        Self {
            kind: ListenerKind::Focus,
            target: EventTarget::Outside,
        }
    }
}

/// Owns the panel-open flag and the listener handles tied to it
pub struct FocusWatcher {
    registry: Arc<dyn GlobalListeners>,
    panel_open: bool,
    click: Option<ListenerHandle>,
    focus: Option<ListenerHandle>,
}

impl FocusWatcher {
    /// Create a watcher with the panel closed and nothing attached
    #[must_use]
    pub fn new(registry: Arc<dyn GlobalListeners>) -> Self {
        Self {
            registry,
            panel_open: false,
            click: None,
            focus: None,
        }
    }

    /// Whether the result panel is open
    #[must_use]
    pub const fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Whether a listener of `kind` is attached
    #[must_use]
    pub const fn is_listening(&self, kind: ListenerKind) -> bool {
        match kind {
            ListenerKind::Click => self.click.is_some(),
            ListenerKind::Focus => self.focus.is_some(),
        }
    }

    /// Open the panel and start watching for outside clicks
    pub fn open_panel(&mut self) {
        self.panel_open = true;
        if self.click.is_none() {
            self.click = Some(ListenerHandle::acquire(&self.registry, ListenerKind::Click));
        }
    }

    /// Close the panel and stop watching for outside clicks
    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.click = None;
    }

    /// Start watching for the first outside focus
    pub fn arm_touch_watch(&mut self) {
        if self.focus.is_none() {
            self.focus = Some(ListenerHandle::acquire(&self.registry, ListenerKind::Focus));
        }
    }

    /// Stop watching for outside focus
    pub fn disarm_touch_watch(&mut self) {
        self.focus = None;
    }

    /// React to a window-level event
    ///
    /// Returns `true` when the event was a qualifying outside interaction,
    /// in which case the panel has been closed.
    pub fn on_global_event(&mut self, event: GlobalEvent) -> bool {
        if !self.is_listening(event.kind) || event.target != EventTarget::Outside {
            return false;
        }
        self.close_panel();
        true
    }

    /// Drop every listener and close the panel
    pub fn release_all(&mut self) {
        self.close_panel();
        self.disarm_touch_watch();
    }
}

impl fmt::Debug for FocusWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusWatcher")
            .field("panel_open", &self.panel_open)
            .field("click", &self.click)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}
