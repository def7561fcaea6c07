//! Host-form projection
//!
//! Translates selection changes into the signals a surrounding form
//! expects: the current value, `required` validity and the touched flag.

/// Validity key reported for the `required` constraint
pub const REQUIRED: &str = "required";

/// Signal for the host form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSignal<T> {
    /// The bound value changed
    Value(Vec<T>),
    /// A validity constraint was re-evaluated
    Validity { key: &'static str, valid: bool },
    /// The control was left for the first time
    Touched,
}

/// Projects selection state into form signals
#[derive(Debug, Clone, Default)]
pub struct ValidationBridge {
    required: bool,
    touched: bool,
    touched_pending: bool,
}

impl ValidationBridge {
    /// Create a bridge for an untouched control
    #[must_use]
    pub const fn new(required: bool) -> Self {
        Self {
            required,
            touched: false,
            touched_pending: false,
        }
    }

    /// Whether the touched signal has been sent
    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    /// Whether the current selection satisfies `required`
    #[must_use]
    pub const fn is_valid(&self, len: usize) -> bool {
        !self.required || len > 0
    }

    /// Signals for a selection changed by the widget
    pub fn selection_changed<T: Clone>(&self, items: &[T]) -> Vec<FormSignal<T>> {
        let mut signals = vec![FormSignal::Value(items.to_vec())];
        signals.extend(self.validity(items.len()));
        signals
    }

    /// Ask for the touched signal on the next outside interaction
    pub const fn request_touched(&mut self) {
        if !self.touched {
            self.touched_pending = true;
        }
    }

    /// Consume a pending touched request
    ///
    /// Returns the `Touched` signal exactly once per request.
    pub fn finalize_touched<T>(&mut self) -> Option<FormSignal<T>> {
        if !self.touched_pending {
            return None;
        }
        self.touched_pending = false;
        self.touched = true;
        Some(FormSignal::Touched)
    }

    /// The host reset the control to untouched
    pub const fn mark_untouched(&mut self) {
        self.touched = false;
        self.touched_pending = false;
    }

    fn validity<T>(&self, len: usize) -> Option<FormSignal<T>> {
        self.required.then(|| FormSignal::Validity {
            key: REQUIRED,
            valid: self.is_valid(len),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_control_reports_value_only() {
        let bridge = ValidationBridge::new(false);
        let signals = bridge.selection_changed(&["a"]);
        assert_eq!(signals, vec![FormSignal::Value(vec!["a"])]);
        assert!(bridge.is_valid(0));
    }

    #[test]
    fn test_required_control_reports_validity() {
        let bridge = ValidationBridge::new(true);
        assert_eq!(
            bridge.selection_changed::<&str>(&[]),
            vec![
                FormSignal::Value(vec![]),
                FormSignal::Validity {
                    key: REQUIRED,
                    valid: false
                }
            ]
        );
        assert_eq!(
            bridge.selection_changed(&["a"])[1],
            FormSignal::Validity {
                key: REQUIRED,
                valid: true
            }
        );
    }

    #[test]
    fn test_touched_is_finalized_once() {
        let mut bridge = ValidationBridge::new(false);
        assert_eq!(bridge.finalize_touched::<&str>(), None);

        bridge.request_touched();
        assert_eq!(bridge.finalize_touched::<&str>(), Some(FormSignal::Touched));
        assert!(bridge.is_touched());
        assert_eq!(bridge.finalize_touched::<&str>(), None);

        bridge.request_touched();
        assert_eq!(bridge.finalize_touched::<&str>(), None);
    }

    #[test]
    fn test_mark_untouched_starts_a_new_period() {
        let mut bridge = ValidationBridge::new(false);
        bridge.request_touched();
        bridge.finalize_touched::<&str>();
        bridge.mark_untouched();
        assert!(!bridge.is_touched());
        bridge.request_touched();
        assert_eq!(bridge.finalize_touched::<&str>(), Some(FormSignal::Touched));
    }
}
