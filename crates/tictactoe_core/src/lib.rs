//! Pure tic-tac-toe logic.
//!
//! - **Board**: nine cells with value-semantics placement ([`Board`])
//! - **Rules**: outcome evaluation over a board ([`evaluate`])
//! - **State**: the turn state machine with generation-tagged automated
//!   moves ([`TurnState`])
//!
//! Nothing here performs I/O or awaits; move providers, notification sinks
//! and rendering live in the application crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod position;
mod state;
mod types;

pub mod rules;

pub use error::MoveError;
pub use position::{Position, Step};
pub use rules::{LINES, Line, Outcome, evaluate};
pub use state::{AutomatedRequest, GameMode, HUMAN_MARK, Placement, Resolution, TurnState};
pub use types::{Board, CELL_COUNT, Cell, Mark, MoveSuggestion};
