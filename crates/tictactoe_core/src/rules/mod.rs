//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. The outcome is always recomputed from the
//! full board rather than tracked incrementally.

pub mod win;

pub use win::{LINES, Line, check_winner};

use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Classification of a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves remain and nobody has won.
    InProgress,
    /// `mark` completed `line`.
    Win {
        /// The winning mark.
        mark: Mark,
        /// The completed line, for highlighting.
        line: Line,
    },
    /// Board full without a completed line.
    Draw,
}

impl Outcome {
    /// True for `Win` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winning line, if any.
    pub fn winning_line(&self) -> Option<Line> {
        match self {
            Outcome::Win { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Evaluates a board.
///
/// Lines are scanned in [`LINES`] order and the first complete one wins, so a
/// board with two complete lines always reports the same one.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((mark, line)) = check_winner(board) {
        return Outcome::Win { mark, line };
    }
    if board.is_full() {
        return Outcome::Draw;
    }
    Outcome::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    const E: Cell = Cell::Empty;
    const X: Cell = Cell::Occupied(Mark::X);
    const O: Cell = Cell::Occupied(Mark::O);

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::empty()), Outcome::InProgress);
    }

    #[test]
    fn test_top_row_win() {
        let board = Board::from_cells([X, X, X, E, O, O, E, E, E]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                mark: Mark::X,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = Board::from_cells([X, O, X, O, X, O, O, X, O]);
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let board = Board::from_cells([X, O, X, O, X, O, O, X, X]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                mark: Mark::X,
                line: [0, 4, 8]
            }
        );
    }

    #[test]
    fn test_first_line_in_table_order_reported() {
        // Row 0 and column 0 both complete: the row comes first.
        let board = Board::from_cells([X, X, X, X, O, O, X, O, O]);
        assert_eq!(evaluate(&board).winning_line(), Some([0, 1, 2]));

        // Column 2 and the anti-diagonal both complete: the column comes first.
        let board = Board::from_cells([X, E, O, E, O, O, O, X, O]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                mark: Mark::O,
                line: [2, 5, 8]
            }
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let board = Board::from_cells([O, X, E, E, O, X, E, E, O]);
        assert_eq!(evaluate(&board), evaluate(&board));
        assert!(evaluate(&board).is_terminal());
    }
}
