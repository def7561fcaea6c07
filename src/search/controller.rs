//! Debounced search controller
//!
//! Owns the query text, the transient result list and the search state.
//! Timers and loader calls are not run here: the controller hands back
//! commands tagged with a generation number, and later calls
//! [`SearchController::debounce_elapsed`] / [`SearchController::load_settled`]
//! are only honoured for the generation that is still current. Every query
//! change bumps the generation, so an earlier timer can never fire and an
//! earlier loader response can never overwrite a fresher one.

use super::error::LoadError;
use super::state::SearchState;
use crate::config::SearchConfig;
use std::time::Duration;

/// What the caller must do with the debounce timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceCommand {
    /// Arm a timer, replacing any armed one
    Start {
        query: String,
        delay: Duration,
        generation: u64,
    },
    /// Disarm any armed timer
    Cancel,
}

/// How a loader response was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Results stored; the panel should open
    Results,
    /// Load failed; state is `Error`
    Failed,
    /// Response belonged to an older generation and was dropped
    Stale,
}

/// Search lifecycle state machine
#[derive(Debug, Clone)]
pub struct SearchController<T> {
    config: SearchConfig,
    state: SearchState,
    query: String,
    results: Vec<T>,
    generation: u64,
    armed: Option<u64>,
    dispatched: Option<u64>,
}

impl<T> SearchController<T> {
    /// Create an idle controller
    #[must_use]
    pub const fn new(config: SearchConfig) -> Self {
        Self {
            config,
            state: SearchState::Idle,
            query: String::new(),
            results: Vec::new(),
            generation: 0,
            armed: None,
            dispatched: None,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// Current query text
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results of the last accepted search
    #[must_use]
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Whether a debounce timer is armed for the current generation
    #[must_use]
    pub const fn debounce_pending(&self) -> bool {
        self.armed.is_some()
    }

    /// Record a query edit and decide what happens to the debounce timer
    pub fn query_changed(&mut self, text: &str) -> DebounceCommand {
        self.query = text.to_string();
        self.invalidate();

        if text.is_empty() {
            self.state = SearchState::Idle;
            return DebounceCommand::Cancel;
        }

        if text.chars().count() < self.config.effective_min_chars() {
            self.state = SearchState::TooShort;
            return DebounceCommand::Cancel;
        }

        self.state = SearchState::Idle;
        self.armed = Some(self.generation);
        DebounceCommand::Start {
            query: self.query.clone(),
            delay: self.config.delay(),
            generation: self.generation,
        }
    }

    /// The debounce timer for `generation` fired
    ///
    /// Returns the query to hand to the loader, or `None` when the timer
    /// belongs to an older generation.
    pub fn debounce_elapsed(&mut self, generation: u64) -> Option<String> {
        if self.armed != Some(generation) {
            tracing::debug!(generation, current = self.generation, "ignoring stale debounce timer");
            return None;
        }
        self.armed = None;
        self.dispatched = Some(generation);
        self.state = SearchState::Loading;
        Some(self.query.clone())
    }

    /// A loader call dispatched under `generation` settled
    pub fn load_settled(
        &mut self,
        generation: u64,
        outcome: Result<Vec<T>, LoadError>,
    ) -> Settlement {
        if self.dispatched != Some(generation) {
            tracing::debug!(generation, current = self.generation, "discarding stale search response");
            return Settlement::Stale;
        }
        self.dispatched = None;

        match outcome {
            Ok(results) => {
                self.state = if results.is_empty() {
                    SearchState::Empty
                } else {
                    SearchState::HasResults
                };
                self.results = results;
                Settlement::Results
            }
            Err(err) => {
                tracing::warn!(query = %self.query, error = %err, "search failed");
                self.state = SearchState::Error;
                Settlement::Failed
            }
        }
    }

    /// Drop the results and return to idle, invalidating anything pending
    pub fn reset(&mut self) -> DebounceCommand {
        self.query.clear();
        self.invalidate();
        self.state = SearchState::Idle;
        DebounceCommand::Cancel
    }

    /// Bump the generation and forget the armed timer and in-flight call
    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.armed = None;
        self.dispatched = None;
        self.results.clear();
    }
}
