//! Search result lifecycle

use crate::config::translations;
use serde::{Deserialize, Serialize};

/// Where the current search stands
///
/// Exactly one of these holds at a time. `Idle` also covers the quiet
/// period while a debounce timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// No query, or waiting for the debounce timer
    #[default]
    Idle,
    /// Query shorter than the configured minimum
    TooShort,
    /// Loader call dispatched, not yet settled
    Loading,
    /// Last search produced at least one result
    HasResults,
    /// Last search produced nothing
    Empty,
    /// Last search failed
    Error,
}

impl SearchState {
    /// Translation key of the status line for this state, if any
    #[must_use]
    pub const fn message_key(self) -> Option<&'static str> {
        match self {
            Self::Idle | Self::HasResults => None,
            Self::TooShort => Some(translations::TOO_SHORT),
            Self::Loading => Some(translations::LOADING),
            Self::Empty => Some(translations::NOTHING_FOUND),
            Self::Error => Some(translations::LOADING_ERROR),
        }
    }
}
