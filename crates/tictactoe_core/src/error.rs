//! Board-level move errors.

/// A move the board cannot accept.
///
/// The turn controller checks these preconditions before placing a mark, so
/// reaching one of these from a running game means a caller skipped a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Cell index {} is outside 0-8", _0)]
    OutOfRange(usize),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(usize),
}

impl std::error::Error for MoveError {}
