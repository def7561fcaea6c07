//! User-facing strings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key of the "maximum reached" message
pub const MAXIMUM_REACHED: &str = "maximum_reached";
/// Key of the "type more characters" message
pub const TOO_SHORT: &str = "too_short";
/// Key of the "loading" message
pub const LOADING: &str = "loading";
/// Key of the "nothing found" message
pub const NOTHING_FOUND: &str = "nothing_found";
/// Key of the "loading failed" message
pub const LOADING_ERROR: &str = "loading_error";

/// Opaque mapping from message key to display string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(HashMap<String, String>);

impl Translations {
    /// Create an empty translation table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a message
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(key.into(), text.into());
        self
    }

    /// Look up a message
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a message, falling back to `fallback`
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// The "maximum reached" message
    #[must_use]
    pub fn maximum_reached(&self) -> &str {
        self.get_or(MAXIMUM_REACHED, "maximum reached")
    }
}
