//! In-memory listener registry for testing

use super::{GlobalListeners, ListenerId, ListenerKind};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: Vec<(ListenerId, ListenerKind)>,
    total_attached: usize,
}

/// Registry that records attach / detach calls
///
/// Useful for asserting that every listener the widget acquires is
/// released again, without a real host environment.
#[derive(Debug, Default)]
pub struct RecordingListeners {
    inner: Mutex<Registry>,
}

impl RecordingListeners {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached listeners of `kind`
    #[must_use]
    pub fn active(&self, kind: ListenerKind) -> usize {
        self.with(|registry| registry.active.iter().filter(|(_, k)| *k == kind).count())
    }

    /// Number of attached listeners of any kind
    #[must_use]
    pub fn active_total(&self) -> usize {
        self.with(|registry| registry.active.len())
    }

    /// Number of attach calls ever made
    #[must_use]
    pub fn total_attached(&self) -> usize {
        self.with(|registry| registry.total_attached)
    }

    fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl GlobalListeners for RecordingListeners {
    fn attach(&self, kind: ListenerKind) -> ListenerId {
        self.with(|registry| {
            registry.next_id += 1;
            registry.total_attached += 1;
            let id = ListenerId(registry.next_id);
            registry.active.push((id, kind));
            id
        })
    }

    fn detach(&self, id: ListenerId) {
        self.with(|registry| registry.active.retain(|(active, _)| *active != id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach() {
        let listeners = RecordingListeners::new();
        let click = listeners.attach(ListenerKind::Click);
        let focus = listeners.attach(ListenerKind::Focus);
        assert_ne!(click, focus);
        assert_eq!(listeners.active_total(), 2);

        listeners.detach(click);
        assert_eq!(listeners.active(ListenerKind::Click), 0);
        assert_eq!(listeners.active(ListenerKind::Focus), 1);
        assert_eq!(listeners.total_attached(), 2);
    }

    #[test]
    fn test_detach_unknown_is_noop() {
        let listeners = RecordingListeners::new();
        listeners.detach(ListenerId(42));
        assert_eq!(listeners.active_total(), 0);
    }
}
