//! Application state and logic.

use super::input::Action;
use crate::controller::TurnController;
use crate::notify::ChimeSink;
use std::sync::Arc;
use tictactoe_core::{GameMode, Mark, Outcome, Position, TurnState};
use tracing::debug;

/// Front-end state around a [`TurnController`]: cursor and sound toggle.
pub struct App {
    controller: TurnController,
    chime: Arc<ChimeSink>,
    cursor: Position,
    provider_label: String,
}

impl App {
    /// Creates a new application.
    pub fn new(controller: TurnController, chime: Arc<ChimeSink>, provider_label: String) -> Self {
        Self {
            controller,
            chime,
            cursor: Position::Center,
            provider_label,
        }
    }

    /// The controller.
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// Cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// True when cues are muted.
    pub fn is_muted(&self) -> bool {
        self.chime.is_muted()
    }

    /// Name of the move provider, for the header.
    pub fn provider_label(&self) -> &str {
        &self.provider_label
    }

    /// Handles an action. Returns false when the app should exit.
    pub fn handle(&mut self, action: Action) -> bool {
        debug!(?action, "Handling action");
        match action {
            Action::Place(index) => {
                if let Some(pos) = Position::from_index(index) {
                    self.cursor = pos;
                }
                self.controller.apply(index);
            }
            Action::PlaceAtCursor => {
                self.controller.apply(self.cursor.to_index());
            }
            Action::Cursor(step) => self.cursor = self.cursor.step(step),
            Action::Reset => self.controller.reset(),
            Action::ToggleMode => {
                let mode = self.controller.state().mode().toggled();
                self.controller.set_mode(mode);
            }
            Action::ToggleMute => {
                self.chime.toggle_muted();
            }
            Action::Quit => return false,
        }
        true
    }
}

/// Status line for a state snapshot.
pub fn status_message(state: &TurnState) -> String {
    let is_ai = |mark: Mark| state.mode().automated_mark() == Some(mark);
    match state.outcome() {
        Outcome::Win { mark, .. } if is_ai(*mark) => "AI wins! Press 'r' to play again.".to_string(),
        Outcome::Win { mark, .. } => format!("Player {} wins! Press 'r' to play again.", mark),
        Outcome::Draw => "It's a draw! Press 'r' to play again.".to_string(),
        Outcome::InProgress if state.pending_automated_move() => "AI is thinking...".to_string(),
        Outcome::InProgress => match state.mode() {
            GameMode::PvAutomated => "Your turn (X).".to_string(),
            GameMode::LocalPvp => format!("Player {}'s turn.", state.active_mark()),
        },
    }
}
