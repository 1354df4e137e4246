//! Keyboard mapping.

use crossterm::event::KeyCode;
use tictactoe_core::Step;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Place at a cell index (digits 1-9).
    Place(usize),
    /// Place at the cursor.
    PlaceAtCursor,
    /// Move the cursor.
    Cursor(Step),
    /// New game.
    Reset,
    /// Switch between local and vs-AI play.
    ToggleMode,
    /// Mute or unmute cues.
    ToggleMute,
    /// Leave.
    Quit,
}

/// Maps a key to an action.
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Action::Place(d as usize - 1)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::PlaceAtCursor),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Cursor(Step::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Cursor(Step::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Cursor(Step::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Cursor(Step::Right)),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('m') => Some(Action::ToggleMode),
        KeyCode::Char('s') => Some(Action::ToggleMute),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_are_one_based() {
        assert_eq!(action_for(KeyCode::Char('1')), Some(Action::Place(0)));
        assert_eq!(action_for(KeyCode::Char('9')), Some(Action::Place(8)));
        assert_eq!(action_for(KeyCode::Char('0')), None);
    }

    #[test]
    fn test_controls() {
        assert_eq!(action_for(KeyCode::Left), Some(Action::Cursor(Step::Left)));
        assert_eq!(action_for(KeyCode::Enter), Some(Action::PlaceAtCursor));
        assert_eq!(action_for(KeyCode::Char('m')), Some(Action::ToggleMode));
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
    }
}
