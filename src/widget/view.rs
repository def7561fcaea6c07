//! Render snapshot
//!
//! Everything a template needs to draw the widget, with items already
//! reduced to keys and labels.

use crate::item::ItemKey;
use crate::keyboard::Focus;
use crate::search::SearchState;
use serde::Serialize;

/// A selected item shown as a chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub key: ItemKey,
    pub label: String,
}

/// A result row in the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub key: ItemKey,
    pub label: String,
    /// Position among selectable rows; `None` when already selected
    pub selectable_index: Option<usize>,
}

impl ResultRow {
    /// Whether the row carries the selectable marker
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.selectable_index.is_some()
    }
}

/// Snapshot of the widget for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub query: String,
    pub state: SearchState,
    pub panel_open: bool,
    pub maximum_reached: bool,
    pub disabled: bool,
    pub chips: Vec<Chip>,
    pub rows: Vec<ResultRow>,
    #[serde(skip)]
    pub focus: Focus,
    pub input_size: f64,
    pub status: Option<String>,
}
