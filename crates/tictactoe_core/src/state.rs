//! Turn state machine.
//!
//! [`TurnState`] holds everything about the game in progress and exposes the
//! transitions a front end can request. Every transition is synchronous; the
//! asynchronous part of an automated turn (asking a move provider) happens
//! between [`TurnState::begin_automated`] and [`TurnState::resolve_automated`],
//! outside this type.
//!
//! Invalid requests are no-ops rather than errors: a stale click on an
//! occupied cell or a finished game must leave the state untouched.
//!
//! Each automated request is tagged with the state's generation. Reset and
//! mode change advance the generation, so a reply that arrives after either
//! is recognised as belonging to an earlier game and dropped, even if its
//! target cell happens to be empty on the new board.

use crate::rules::{Outcome, evaluate};
use crate::types::{Board, Mark, MoveSuggestion};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// The mark a human always plays against the automated opponent.
pub const HUMAN_MARK: Mark = Mark::X;

/// Who plays the second mark.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum GameMode {
    /// Two humans sharing one board.
    #[default]
    #[serde(rename = "pvp", alias = "local")]
    #[strum(to_string = "Local PvP")]
    LocalPvp,
    /// Human plays X, a move provider plays O.
    #[serde(rename = "ai", alias = "automated")]
    #[strum(to_string = "Versus AI")]
    PvAutomated,
}

impl GameMode {
    /// The mark played by the move provider, if this mode has one.
    pub fn automated_mark(self) -> Option<Mark> {
        match self {
            GameMode::LocalPvp => None,
            GameMode::PvAutomated => Some(HUMAN_MARK.opponent()),
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            GameMode::LocalPvp => GameMode::PvAutomated,
            GameMode::PvAutomated => GameMode::LocalPvp,
        }
    }
}

/// A mark that landed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Cell index.
    pub index: usize,
    /// Mark placed.
    pub mark: Mark,
    /// Outcome after the placement.
    pub outcome: Outcome,
}

/// Ticket for an automated move in flight.
///
/// Carries the board the provider is asked about and the generation the
/// request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatedRequest {
    generation: u64,
    board: Board,
    mark: Mark,
}

impl AutomatedRequest {
    /// Generation at request time.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Board at request time.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark the automated player places.
    pub fn mark(&self) -> Mark {
        self.mark
    }
}

/// What happened to an automated move when it came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The move was placed.
    Applied(Placement),
    /// The request belongs to an earlier game; nothing changed.
    Stale,
    /// The target cell was not empty on the current board; nothing placed.
    Occupied,
    /// No move was offered; the turn was given up and nothing placed.
    Abandoned,
}

/// Complete state of one game plus the bookkeeping for automated turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    board: Board,
    active_mark: Mark,
    mode: GameMode,
    outcome: Outcome,
    pending_automated_move: bool,
    generation: u64,
    annotation: Option<String>,
}

impl TurnState {
    /// Creates the initial state for `mode`: empty board, X to move.
    #[instrument]
    pub fn new(mode: GameMode) -> Self {
        Self {
            board: Board::empty(),
            active_mark: Mark::X,
            mode,
            outcome: Outcome::InProgress,
            pending_automated_move: false,
            generation: 0,
            annotation: None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move next.
    pub fn active_mark(&self) -> Mark {
        self.active_mark
    }

    /// Current mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// True while an automated move is in flight.
    pub fn pending_automated_move(&self) -> bool {
        self.pending_automated_move
    }

    /// Game instance counter, advanced by every reset and mode change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Comment attached to the last automated move of this game.
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// True when the automated player should be asked for a move now.
    pub fn automated_turn_due(&self) -> bool {
        !self.pending_automated_move
            && !self.outcome.is_terminal()
            && self.mode.automated_mark() == Some(self.active_mark)
    }

    /// True when a human may place the active mark.
    pub fn accepts_human_move(&self) -> bool {
        !self.pending_automated_move
            && !self.outcome.is_terminal()
            && self.mode.automated_mark() != Some(self.active_mark)
    }

    /// Places the active mark at `index` for a human player.
    ///
    /// Returns `None` without touching the state when the game is over, an
    /// automated move is pending, it is the automated player's turn, or the
    /// cell is occupied or out of range.
    #[instrument(skip(self), fields(generation = self.generation, mark = %self.active_mark))]
    pub fn apply_human(&mut self, index: usize) -> Option<Placement> {
        if !self.accepts_human_move() {
            debug!("Human move ignored: not accepting moves");
            return None;
        }
        let board = match self.board.place(index, self.active_mark) {
            Ok(board) => board,
            Err(e) => {
                debug!(error = %e, "Human move ignored");
                return None;
            }
        };
        Some(self.commit(index, self.active_mark, board))
    }

    /// Starts an automated turn if one is due.
    ///
    /// Sets the pending flag and returns the ticket to resolve later. Returns
    /// `None` when no automated turn is due, which includes a request already
    /// being in flight.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn begin_automated(&mut self) -> Option<AutomatedRequest> {
        if !self.automated_turn_due() {
            return None;
        }
        self.pending_automated_move = true;
        debug!("Automated move requested");
        Some(AutomatedRequest {
            generation: self.generation,
            board: self.board,
            mark: self.active_mark,
        })
    }

    /// Applies the answer to an automated request.
    ///
    /// A request from an earlier generation is dropped without touching the
    /// state. Otherwise the pending flag is cleared and the suggestion is
    /// placed if its cell is still empty.
    #[instrument(skip(self, request, suggestion), fields(
        generation = self.generation,
        request_generation = request.generation,
        index = suggestion.index,
    ))]
    pub fn resolve_automated(
        &mut self,
        request: &AutomatedRequest,
        suggestion: MoveSuggestion,
    ) -> Resolution {
        if request.generation != self.generation {
            info!("Dropping automated move from an earlier game");
            return Resolution::Stale;
        }
        self.pending_automated_move = false;

        let board = match self.board.place(suggestion.index, request.mark) {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "Dropping automated move");
                return Resolution::Occupied;
            }
        };
        self.annotation = Some(suggestion.annotation);
        Resolution::Applied(self.commit(suggestion.index, request.mark, board))
    }

    /// Gives up on an automated request without placing anything.
    ///
    /// Clears the pending flag if the request belongs to the current game.
    /// Returns `Stale` for a request from an earlier game, else `Abandoned`.
    #[instrument(skip(self, request), fields(generation = self.generation, request_generation = request.generation))]
    pub fn abandon_automated(&mut self, request: &AutomatedRequest) -> Resolution {
        if request.generation != self.generation {
            return Resolution::Stale;
        }
        warn!("Automated move abandoned");
        self.pending_automated_move = false;
        Resolution::Abandoned
    }

    /// Starts a fresh game in the current mode.
    ///
    /// Valid at any time; an automated request in flight becomes stale.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(self.mode);
        self.generation = generation;
        info!(generation, "Game reset");
    }

    /// Switches mode and resets.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    fn commit(&mut self, index: usize, mark: Mark, board: Board) -> Placement {
        self.board = board;
        self.outcome = evaluate(&self.board);
        if !self.outcome.is_terminal() {
            self.active_mark = mark.opponent();
        }
        info!(index, %mark, outcome = ?self.outcome, "Mark placed");
        Placement {
            index,
            mark,
            outcome: self.outcome,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(state: &mut TurnState, moves: &[usize]) {
        for &index in moves {
            assert!(state.apply_human(index).is_some(), "move {index} rejected");
        }
    }

    #[test]
    fn test_alternating_local_moves() {
        let mut state = TurnState::new(GameMode::LocalPvp);
        play(&mut state, &[4, 0]);
        assert_eq!(state.outcome(), &Outcome::InProgress);
        assert_eq!(state.active_mark(), Mark::X);
        assert_eq!(state.board().empty_indices().len(), 7);
    }

    #[test]
    fn test_occupied_cell_is_noop() {
        let mut state = TurnState::new(GameMode::LocalPvp);
        play(&mut state, &[4]);
        let before = state.clone();
        assert_eq!(state.apply_human(4), None);
        assert_eq!(state.apply_human(42), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_terminal_state_is_noop() {
        let mut state = TurnState::new(GameMode::LocalPvp);
        play(&mut state, &[0, 3, 1, 4, 2]);
        assert_eq!(
            state.outcome(),
            &Outcome::Win {
                mark: Mark::X,
                line: [0, 1, 2]
            }
        );
        assert_eq!(state.active_mark(), Mark::X);
        let before = state.clone();
        assert_eq!(state.apply_human(8), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_automated_turn_due_after_human_move() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        assert!(!state.automated_turn_due());
        play(&mut state, &[4]);
        assert!(state.automated_turn_due());
        assert!(!state.accepts_human_move());
        assert_eq!(state.apply_human(0), None);
    }

    #[test]
    fn test_pending_blocks_humans_and_second_request() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        play(&mut state, &[4]);
        let request = state.begin_automated().unwrap();
        assert!(state.pending_automated_move());
        assert_eq!(request.mark(), Mark::O);
        assert_eq!(request.board(), state.board());
        assert_eq!(state.begin_automated(), None);

        let before = state.clone();
        assert_eq!(state.apply_human(0), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_resolve_applies_and_flips_back() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        play(&mut state, &[4]);
        let request = state.begin_automated().unwrap();
        let resolution = state.resolve_automated(&request, MoveSuggestion::new(0, "corner"));
        assert!(matches!(resolution, Resolution::Applied(p) if p.index == 0 && p.mark == Mark::O));
        assert!(!state.pending_automated_move());
        assert_eq!(state.active_mark(), Mark::X);
        assert_eq!(state.annotation(), Some("corner"));
    }

    #[test]
    fn test_resolve_on_occupied_cell_drops_move() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        play(&mut state, &[4]);
        let request = state.begin_automated().unwrap();
        let board_before = *state.board();
        let resolution = state.resolve_automated(&request, MoveSuggestion::new(4, "mine"));
        assert_eq!(resolution, Resolution::Occupied);
        assert_eq!(state.board(), &board_before);
        assert_eq!(state.active_mark(), Mark::O);
        assert!(!state.pending_automated_move());
    }

    #[test]
    fn test_reset_makes_request_stale() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        play(&mut state, &[4]);
        let request = state.begin_automated().unwrap();
        state.reset();
        assert_eq!(state.generation(), 1);
        assert!(!state.pending_automated_move());

        let resolution = state.resolve_automated(&request, MoveSuggestion::new(3, "late"));
        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(state.board(), &Board::empty());
        assert_eq!(state.annotation(), None);
    }

    #[test]
    fn test_abandon_clears_pending_for_current_game_only() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        play(&mut state, &[4]);
        let request = state.begin_automated().unwrap();
        assert_eq!(state.abandon_automated(&request), Resolution::Abandoned);
        assert!(!state.pending_automated_move());
        assert!(state.automated_turn_due());

        let request = state.begin_automated().unwrap();
        state.reset();
        assert_eq!(state.abandon_automated(&request), Resolution::Stale);
    }

    #[test]
    fn test_set_mode_resets_and_advances_generation() {
        let mut state = TurnState::new(GameMode::LocalPvp);
        play(&mut state, &[0, 1]);
        state.set_mode(GameMode::PvAutomated);
        assert_eq!(state.mode(), GameMode::PvAutomated);
        assert_eq!(state.board(), &Board::empty());
        assert_eq!(state.active_mark(), Mark::X);
        assert_eq!(state.generation(), 1);
        state.reset();
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn test_winning_automated_move_keeps_active_mark() {
        let mut state = TurnState::new(GameMode::PvAutomated);
        for (human, ai) in [(0, 3), (1, 4)] {
            play(&mut state, &[human]);
            let request = state.begin_automated().unwrap();
            state.resolve_automated(&request, MoveSuggestion::new(ai, ""));
        }
        play(&mut state, &[8]);
        let request = state.begin_automated().unwrap();
        state.resolve_automated(&request, MoveSuggestion::new(5, "gg"));
        assert_eq!(
            state.outcome(),
            &Outcome::Win {
                mark: Mark::O,
                line: [3, 4, 5]
            }
        );
        assert_eq!(state.active_mark(), Mark::O);
        assert!(!state.automated_turn_due());
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: GameMode = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(mode, GameMode::PvAutomated);
        let mode: GameMode = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(mode, GameMode::LocalPvp);
        assert_eq!(GameMode::PvAutomated.to_string(), "Versus AI");
    }
}
