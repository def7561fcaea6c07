//! Host sink that records everything it is asked to do

use super::WidgetHost;
use crate::widget::{Effect, ViewModel};

/// Collects effects and rendered views
#[derive(Debug)]
pub struct RecordingHost<T> {
    pub effects: Vec<Effect<T>>,
    pub views: Vec<ViewModel>,
}

impl<T> RecordingHost<T> {
    /// Create an empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            effects: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Most recent view, if anything was rendered
    #[must_use]
    pub fn last_view(&self) -> Option<&ViewModel> {
        self.views.last()
    }
}

impl<T> Default for RecordingHost<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> WidgetHost<T> for RecordingHost<T> {
    fn apply(&mut self, effect: Effect<T>) {
        self.effects.push(effect);
    }

    fn render(&mut self, view: &ViewModel) {
        self.views.push(view.clone());
    }
}
