//! Debounced asynchronous search
//!
//! Provides the search half of the widget:
//! 1. `SearchController` tracks the query, result list and lifecycle state
//! 2. `SearchLoader` is the host-provided backend the controller feeds

pub mod controller;
pub mod error;
pub mod loader;
pub mod state;

pub use controller::{DebounceCommand, SearchController, Settlement};
pub use error::LoadError;
pub use loader::{FnLoader, SearchLoader, StaticLoader};
pub use state::SearchState;
