//! Keyboard contract of the widget
//!
//! Only five keys mean anything to the widget. They form a closed
//! enumeration, built from legacy DOM key codes, DOM key names, or
//! crossterm key codes. The navigator turns a key plus the element it was
//! pressed on into a list of [`KeyAction`]s that the widget applies.
//!
//! Rows are addressed by their position among the *selectable* rows, i.e.
//! the current results that are not already selected.

use crossterm::event::KeyCode;
use std::fmt;
use std::str::FromStr;

/// Recognized keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    ArrowDown,
    ArrowUp,
    Escape,
    Enter,
}

impl Key {
    /// Map a legacy numeric key code
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            8 => Some(Self::Backspace),
            40 => Some(Self::ArrowDown),
            38 => Some(Self::ArrowUp),
            27 => Some(Self::Escape),
            13 => Some(Self::Enter),
            _ => None,
        }
    }

    /// Legacy numeric key code
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Backspace => 8,
            Self::ArrowDown => 40,
            Self::ArrowUp => 38,
            Self::Escape => 27,
            Self::Enter => 13,
        }
    }

    /// Map a crossterm key code
    #[must_use]
    pub const fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Backspace => Some(Self::Backspace),
            KeyCode::Down => Some(Self::ArrowDown),
            KeyCode::Up => Some(Self::ArrowUp),
            KeyCode::Esc => Some(Self::Escape),
            KeyCode::Enter => Some(Self::Enter),
            _ => None,
        }
    }

    /// DOM key name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Backspace => "Backspace",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowUp => "ArrowUp",
            Self::Escape => "Escape",
            Self::Enter => "Enter",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A key name outside the recognized set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Backspace" => Ok(Self::Backspace),
            "ArrowDown" | "Down" => Ok(Self::ArrowDown),
            "ArrowUp" | "Up" => Ok(Self::ArrowUp),
            "Escape" | "Esc" => Ok(Self::Escape),
            "Enter" => Ok(Self::Enter),
            other => Err(UnknownKey(other.to_string())),
        }
    }
}

/// Caret / selection range inside the text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    pub start: usize,
    pub end: usize,
}

impl Caret {
    /// Collapsed caret at `position`
    #[must_use]
    pub const fn at(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Caret collapsed at the very start of the input
    #[must_use]
    pub const fn is_at_start(self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// Element a key was pressed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// The query text input
    Input { caret: Caret },
    /// A selectable result row
    Row(usize),
}

/// A key press on the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub target: KeyTarget,
}

impl KeyInput {
    /// Key pressed in the text input
    #[must_use]
    pub const fn on_input(key: Key, caret: Caret) -> Self {
        Self {
            key,
            target: KeyTarget::Input { caret },
        }
    }

    /// Key pressed on a selectable row
    #[must_use]
    pub const fn on_row(key: Key, row: usize) -> Self {
        Self {
            key,
            target: KeyTarget::Row(row),
        }
    }
}

/// Element holding keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Row(usize),
}

/// What the widget should do in response to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    OpenPanel,
    ClosePanel,
    FocusInput,
    FocusRow(usize),
    PopLast,
    SelectFirst,
    SelectRow(usize),
    PreventDefault,
}

/// Widget state the navigator needs to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub panel_open: bool,
    pub selectable_rows: usize,
}

/// Maps key presses to actions and tracks which element has focus
#[derive(Debug, Clone, Default)]
pub struct KeyboardNavigator {
    focus: Focus,
}

impl KeyboardNavigator {
    /// Create a navigator with focus on the input
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Element currently holding focus
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Record that focus moved back to the input
    pub const fn focus_input(&mut self) {
        self.focus = Focus::Input;
    }

    /// Translate `input` into actions
    pub fn handle(&mut self, input: KeyInput, ctx: KeyContext) -> Vec<KeyAction> {
        self.focus = match input.target {
            KeyTarget::Input { .. } => Focus::Input,
            KeyTarget::Row(row) => Focus::Row(row),
        };

        match input.key {
            Key::ArrowDown | Key::ArrowUp => {
                let mut actions = vec![KeyAction::OpenPanel];
                if let Some(next) = step(self.focus, input.key, ctx.selectable_rows) {
                    self.focus = Focus::Row(next);
                    actions.push(KeyAction::FocusRow(next));
                }
                actions.push(KeyAction::PreventDefault);
                actions
            }
            Key::Backspace => match input.target {
                KeyTarget::Input { caret } if caret.is_at_start() => {
                    vec![KeyAction::PopLast, KeyAction::PreventDefault]
                }
                _ => Vec::new(),
            },
            Key::Escape => {
                self.focus = Focus::Input;
                vec![KeyAction::FocusInput, KeyAction::ClosePanel]
            }
            Key::Enter => match input.target {
                KeyTarget::Input { .. } if ctx.panel_open => {
                    vec![KeyAction::PreventDefault, KeyAction::SelectFirst]
                }
                KeyTarget::Input { .. } => vec![KeyAction::PreventDefault],
                KeyTarget::Row(row) if row < ctx.selectable_rows => {
                    vec![KeyAction::PreventDefault, KeyAction::SelectRow(row)]
                }
                KeyTarget::Row(_) => Vec::new(),
            },
        }
    }
}

/// Next selectable row for an arrow key, wrapping at both ends
fn step(from: Focus, key: Key, rows: usize) -> Option<usize> {
    if rows == 0 {
        return None;
    }
    let next = match (from, key) {
        (Focus::Input, Key::ArrowDown) => 0,
        (Focus::Input, _) => rows - 1,
        (Focus::Row(row), Key::ArrowDown) => {
            if row + 1 >= rows {
                0
            } else {
                row + 1
            }
        }
        (Focus::Row(row), _) => {
            if row == 0 || row > rows {
                rows - 1
            } else {
                row - 1
            }
        }
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: KeyContext = KeyContext {
        panel_open: true,
        selectable_rows: 3,
    };

    #[test]
    fn test_key_codes_round_trip() {
        for key in [
            Key::Backspace,
            Key::ArrowDown,
            Key::ArrowUp,
            Key::Escape,
            Key::Enter,
        ] {
            assert_eq!(Key::from_code(key.code()), Some(key));
            assert_eq!(key.name().parse::<Key>(), Ok(key));
        }
        assert_eq!(Key::from_code(65), None);
    }

    #[test]
    fn test_from_crossterm() {
        assert_eq!(Key::from_key_code(KeyCode::Down), Some(Key::ArrowDown));
        assert_eq!(Key::from_key_code(KeyCode::Esc), Some(Key::Escape));
        assert_eq!(Key::from_key_code(KeyCode::Char('a')), None);
    }

    #[test]
    fn test_unknown_key_name() {
        let err = "Tab".parse::<Key>().unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized key: Tab");
    }

    #[test]
    fn test_down_from_input_focuses_first_row() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_input(Key::ArrowDown, Caret::at(0)), OPEN);
        assert_eq!(
            actions,
            vec![
                KeyAction::OpenPanel,
                KeyAction::FocusRow(0),
                KeyAction::PreventDefault
            ]
        );
        assert_eq!(nav.focus(), Focus::Row(0));
    }

    #[test]
    fn test_down_on_last_row_wraps_to_first() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_row(Key::ArrowDown, 2), OPEN);
        assert!(actions.contains(&KeyAction::FocusRow(0)));
        assert_eq!(nav.focus(), Focus::Row(0));
    }

    #[test]
    fn test_up_on_first_row_wraps_to_last() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_row(Key::ArrowUp, 0), OPEN);
        assert!(actions.contains(&KeyAction::FocusRow(2)));
    }

    #[test]
    fn test_up_from_input_focuses_last_row() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_input(Key::ArrowUp, Caret::at(3)), OPEN);
        assert!(actions.contains(&KeyAction::FocusRow(2)));
    }

    #[test]
    fn test_arrows_without_rows_only_open_panel() {
        let mut nav = KeyboardNavigator::new();
        let ctx = KeyContext {
            panel_open: false,
            selectable_rows: 0,
        };
        let actions = nav.handle(KeyInput::on_input(Key::ArrowDown, Caret::at(0)), ctx);
        assert_eq!(actions, vec![KeyAction::OpenPanel, KeyAction::PreventDefault]);
        assert_eq!(nav.focus(), Focus::Input);
    }

    #[test]
    fn test_backspace_at_start_pops() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_input(Key::Backspace, Caret::at(0)), OPEN);
        assert_eq!(actions, vec![KeyAction::PopLast, KeyAction::PreventDefault]);
    }

    #[test]
    fn test_backspace_elsewhere_is_plain_editing() {
        let mut nav = KeyboardNavigator::new();
        assert!(nav
            .handle(KeyInput::on_input(Key::Backspace, Caret::at(2)), OPEN)
            .is_empty());
        let range = Caret { start: 0, end: 3 };
        assert!(nav
            .handle(KeyInput::on_input(Key::Backspace, range), OPEN)
            .is_empty());
        assert!(nav.handle(KeyInput::on_row(Key::Backspace, 1), OPEN).is_empty());
    }

    #[test]
    fn test_escape_returns_to_input() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_row(Key::Escape, 1), OPEN);
        assert_eq!(actions, vec![KeyAction::FocusInput, KeyAction::ClosePanel]);
        assert_eq!(nav.focus(), Focus::Input);
    }

    #[test]
    fn test_enter_in_input() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_input(Key::Enter, Caret::at(4)), OPEN);
        assert_eq!(actions, vec![KeyAction::PreventDefault, KeyAction::SelectFirst]);

        let closed = KeyContext {
            panel_open: false,
            selectable_rows: 3,
        };
        let actions = nav.handle(KeyInput::on_input(Key::Enter, Caret::at(4)), closed);
        assert_eq!(actions, vec![KeyAction::PreventDefault]);
    }

    #[test]
    fn test_enter_on_row_selects_it() {
        let mut nav = KeyboardNavigator::new();
        let actions = nav.handle(KeyInput::on_row(Key::Enter, 1), OPEN);
        assert_eq!(actions, vec![KeyAction::PreventDefault, KeyAction::SelectRow(1)]);
        assert!(nav.handle(KeyInput::on_row(Key::Enter, 7), OPEN).is_empty());
    }
}
