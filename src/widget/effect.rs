//! Side effects requested by the widget store

use crate::search::DebounceCommand;
use crate::validation::FormSignal;
use std::time::Duration;

/// Work the host (or the [`runtime`](crate::runtime)) must carry out after a
/// store transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<T> {
    /// Arm the debounce timer, replacing any armed one; on expiry call
    /// `on_debounce_elapsed(generation)`
    StartDebounce {
        query: String,
        delay: Duration,
        generation: u64,
    },
    /// Disarm the debounce timer
    CancelDebounce,
    /// Call the loader; on completion call `on_load_settled(generation, ..)`
    Load { query: String, generation: u64 },
    /// Replace the text shown in the query input
    SetQuery(String),
    /// Move keyboard focus to the query input
    FocusInput,
    /// Move keyboard focus to the n-th selectable row
    FocusRow(usize),
    /// Suppress the default action of the key event being handled
    PreventDefault,
    /// Notify the host form
    Form(FormSignal<T>),
}

impl<T> From<DebounceCommand> for Effect<T> {
    fn from(command: DebounceCommand) -> Self {
        match command {
            DebounceCommand::Start {
                query,
                delay,
                generation,
            } => Self::StartDebounce {
                query,
                delay,
                generation,
            },
            DebounceCommand::Cancel => Self::CancelDebounce,
        }
    }
}

impl<T> From<FormSignal<T>> for Effect<T> {
    fn from(signal: FormSignal<T>) -> Self {
        Self::Form(signal)
    }
}
