//! Tagsearch - A debounced multi-select tag search input
//!
//! This library models the state of a tag picker: the user types a query,
//! the widget waits for a pause, asks a host-provided backend for matching
//! items and lets the user pick several of them with mouse or keyboard.
//! Selected items are unique by key, optionally capped, and reported to a
//! surrounding form together with `required` validity and a touched flag.
//!
//! The core is the synchronous [`TagSearch`] store, whose transitions
//! return [`Effect`]s. The [`runtime`] module drives it on tokio.

use thiserror::Error;

pub mod config;
pub mod focus;
pub mod item;
pub mod keyboard;
pub mod runtime;
pub mod search;
pub mod selection;
pub mod validation;
pub mod widget;

pub use crate::config::{SearchConfig, Translations, WidgetConfig};
pub use focus::{GlobalEvent, GlobalListeners, ListenerKind};
pub use item::{ItemAdapter, ItemKey, TagItem};
pub use keyboard::{Key, KeyInput};
pub use runtime::{Session, WidgetEvent, WidgetHost};
pub use search::{LoadError, SearchLoader, SearchState};
pub use selection::Rejection;
pub use validation::FormSignal;
pub use widget::{Effect, TagSearch, ViewModel};

/// Error enum, contains all failure states of the library
#[derive(Debug, Error)]
pub enum TagSearchError {
    /// A loader call failed
    #[error("Search error: {0}")]
    Load(#[from] LoadError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<keyboard::UnknownKey> for TagSearchError {
    fn from(err: keyboard::UnknownKey) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result alias for fallible library calls
pub type Result<T> = std::result::Result<T, TagSearchError>;
