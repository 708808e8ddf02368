//! Key handling for the search box and the results list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::InputMode;

/// Change to the search term reported by the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    /// Appends a character.
    Insert(char),
    /// Removes the last character.
    Backspace,
    /// Empties the term.
    Clear,
}

impl InputEdit {
    /// Applies the edit to `term`. Returns `true` if the term changed.
    pub fn apply(self, term: &mut String) -> bool {
        match self {
            Self::Insert(c) => {
                term.push(c);
                true
            }
            Self::Backspace => term.pop().is_some(),
            Self::Clear => {
                let changed = !term.is_empty();
                term.clear();
                changed
            }
        }
    }
}

/// Action requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Edit the search term.
    Edit(InputEdit),
    /// Focus the search box.
    StartEditing,
    /// Leave the search box, keeping the term.
    StopEditing,
    /// Leave the search box and clear the term.
    CancelEditing,
    /// Move the results cursor up.
    MoveUp,
    /// Move the results cursor down.
    MoveDown,
    /// Open the selected movie page in the browser.
    OpenSelected,
    /// Exit the application.
    Quit,
}

/// Maps a key press to an action for the given input mode.
#[must_use]
pub fn key_action(mode: InputMode, key: KeyEvent) -> Option<InputAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputAction::Quit);
    }
    match mode {
        InputMode::Editing => editing_action(key.code),
        InputMode::Normal => normal_action(key.code),
    }
}

fn editing_action(code: KeyCode) -> Option<InputAction> {
    let action = match code {
        KeyCode::Esc => InputAction::CancelEditing,
        KeyCode::Enter => InputAction::StopEditing,
        KeyCode::Backspace => InputAction::Edit(InputEdit::Backspace),
        KeyCode::Char(c) => InputAction::Edit(InputEdit::Insert(c)),
        _ => return None,
    };
    Some(action)
}

fn normal_action(code: KeyCode) -> Option<InputAction> {
    let action = match code {
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('/' | 'i') => InputAction::StartEditing,
        KeyCode::Up | KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('o') => InputAction::OpenSelected,
        _ => return None,
    };
    Some(action)
}
