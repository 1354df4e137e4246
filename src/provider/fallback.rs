//! Local fallback move selection.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tictactoe_core::{Board, MoveSuggestion};
use tracing::{debug, instrument};

/// Annotation attached to fallback moves.
pub const FALLBACK_ANNOTATION: &str = "...";

/// Picks a uniformly random empty cell.
///
/// The random source is injected so tests can replay a fixed sequence.
pub struct FallbackPicker {
    rng: Box<dyn RngCore + Send>,
}

impl FallbackPicker {
    /// Uses `rng` as the random source.
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Deterministic picker for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Picker seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Picks an empty cell on `board`.
    ///
    /// Returns `None` only for a full board, which callers never pass.
    #[instrument(skip(self, board))]
    pub fn pick(&mut self, board: &Board) -> Option<MoveSuggestion> {
        let empty = board.empty_indices();
        let index = *empty.choose(self.rng.as_mut())?;
        debug!(index, candidates = empty.len(), "Fallback move picked");
        Some(MoveSuggestion::new(index, FALLBACK_ANNOTATION))
    }
}

impl std::fmt::Debug for FallbackPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackPicker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_core::Mark;

    #[test]
    fn test_pick_is_always_an_empty_cell() {
        let mut picker = FallbackPicker::seeded(7);
        let mut board = Board::empty();
        for turn in 0..9 {
            let suggestion = picker.pick(&board).unwrap();
            assert!(board.empty_indices().contains(&suggestion.index));
            assert_eq!(suggestion.annotation, FALLBACK_ANNOTATION);
            let mark = if turn % 2 == 0 { Mark::X } else { Mark::O };
            board = board.place(suggestion.index, mark).unwrap();
        }
        assert_eq!(picker.pick(&board), None);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let board = Board::empty().place(4, Mark::X).unwrap();
        let mut a = FallbackPicker::seeded(42);
        let mut b = FallbackPicker::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.pick(&board), b.pick(&board));
        }
    }

    #[test]
    fn test_single_empty_cell_is_forced() {
        let board = (0..8)
            .try_fold(Board::empty(), |b, i| {
                b.place(i, if i % 2 == 0 { Mark::X } else { Mark::O })
            })
            .unwrap();
        let mut picker = FallbackPicker::from_entropy();
        assert_eq!(picker.pick(&board).map(|s| s.index), Some(8));
    }
}
