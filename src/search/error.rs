//! Search-specific error types
//!
//! The widget recognizes exactly one failure: the host loader could not
//! produce results. The cause is carried for logging only; it is never
//! inspected and the search is never retried automatically. The next
//! qualifying keystroke starts a fresh search.

use thiserror::Error;

/// The host loader failed to produce results
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Loading search results failed: {reason}")]
pub struct LoadError {
    reason: String,
}

impl LoadError {
    /// Create a load error with a human-readable reason
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Wrap any error as a load failure
    #[must_use]
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    /// The reason given by the loader
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_error(&err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_error(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
