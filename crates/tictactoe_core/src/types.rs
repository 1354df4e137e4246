//! Core domain types for tic-tac-toe.

use crate::error::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A mark a player places on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second, the automated player in vs-AI games).
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board, cells in row-major order (0-8).
///
/// ```text
/// 0 | 1 | 2
/// ---------
/// 3 | 4 | 5
/// ---------
/// 6 | 7 | 8
/// ```
///
/// Boards are values: [`Board::place`] returns a new board and leaves the
/// receiver untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a board with nine empty cells.
    pub fn empty() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Creates a board from explicit cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Returns a new board with `mark` placed at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfRange`] for an index past 8 and
    /// [`MoveError::Occupied`] when the cell already holds a mark.
    #[instrument(skip(self))]
    pub fn place(&self, index: usize, mark: Mark) -> Result<Board, MoveError> {
        match self.get(index) {
            None => Err(MoveError::OutOfRange(index)),
            Some(Cell::Occupied(_)) => Err(MoveError::Occupied(index)),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[index] = Cell::Occupied(mark);
                Ok(next)
            }
        }
    }

    /// Indices of all empty cells, ascending.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Cells as `Some("X")`, `Some("O")` or `None`, the shape used in prompts.
    pub fn as_symbols(&self) -> [Option<&'static str>; CELL_COUNT] {
        self.cells.map(|c| match c {
            Cell::Empty => None,
            Cell::Occupied(Mark::X) => Some("X"),
            Cell::Occupied(Mark::O) => Some("O"),
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// A move proposed for the automated player.
///
/// The annotation is shown to the user and never affects game logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveSuggestion {
    /// Proposed cell index. Untrusted until checked against a board.
    pub index: usize,
    /// Short decorative comment.
    #[new(into)]
    pub annotation: String,
}

impl MoveSuggestion {
    /// Checks that the suggestion targets an empty cell on `board`.
    pub fn is_playable_on(&self, board: &Board) -> bool {
        board.is_empty(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_all_indices() {
        let board = Board::empty();
        assert_eq!(board.empty_indices(), (0..9).collect::<Vec<_>>());
        assert!(!board.is_full());
    }

    #[test]
    fn test_place_returns_new_board() {
        let board = Board::empty();
        let next = board.place(4, Mark::X).unwrap();
        assert_eq!(board, Board::empty());
        assert_eq!(next.get(4), Some(Cell::Occupied(Mark::X)));
        assert_eq!(next.empty_indices(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let board = Board::empty().place(0, Mark::X).unwrap();
        assert_eq!(board.place(0, Mark::O), Err(MoveError::Occupied(0)));
        assert_eq!(board.place(9, Mark::O), Err(MoveError::OutOfRange(9)));
    }

    #[test]
    fn test_full_board() {
        let board = (0..9)
            .try_fold(Board::empty(), |b, i| {
                b.place(i, if i % 2 == 0 { Mark::X } else { Mark::O })
            })
            .unwrap();
        assert!(board.is_full());
        assert!(board.empty_indices().is_empty());
    }

    #[test]
    fn test_symbols_serialize_like_a_js_array() {
        let board = Board::empty().place(1, Mark::O).unwrap();
        let json = serde_json::to_string(&board.as_symbols()).unwrap();
        assert_eq!(json, r#"[null,"O",null,null,null,null,null,null,null]"#);
    }

    #[test]
    fn test_suggestion_playability() {
        let board = Board::empty().place(3, Mark::X).unwrap();
        assert!(!MoveSuggestion::new(3, "taken").is_playable_on(&board));
        assert!(!MoveSuggestion::new(12, "nowhere").is_playable_on(&board));
        assert!(MoveSuggestion::new(5, "ok").is_playable_on(&board));
    }
}
