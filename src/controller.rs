//! Turn controller: the single owner of the game state.
//!
//! Front ends send `apply`, `reset` and `set_mode`, then read the state back
//! through [`TurnController::state`] or a [`TurnController::subscribe`]
//! receiver. None of these calls report errors; requests that do not fit the
//! current state are ignored.
//!
//! All mutations go through one mutex that is never held across an await.
//! The only await is the move provider call, made on a spawned task between
//! `TurnState::begin_automated` and `TurnState::resolve_automated`.
//!
//! Events are handed to the sink while the mutex is held, so sinks see them
//! in the same order as the state changes they describe.

use crate::notify::{GameEvent, NotificationSink};
use crate::provider::{FallbackPicker, MoveProvider, choose_move};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tictactoe_core::{
    AutomatedRequest, Board, GameMode, MoveSuggestion, Outcome, Placement, Resolution, TurnState,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

struct Inner {
    state: Mutex<TurnState>,
    provider: Arc<dyn MoveProvider>,
    sink: Arc<dyn NotificationSink>,
    fallback: Mutex<FallbackPicker>,
    updates: watch::Sender<TurnState>,
}

/// Orchestrates turns between a human and, in vs-AI mode, a move provider.
///
/// Cheap to clone; clones share the same game.
#[derive(Clone)]
pub struct TurnController {
    inner: Arc<Inner>,
}

impl TurnController {
    /// Creates a controller with a fresh game in `mode`.
    #[instrument(skip(provider, sink, fallback), fields(provider = provider.name()))]
    pub fn new(
        mode: GameMode,
        provider: Arc<dyn MoveProvider>,
        sink: Arc<dyn NotificationSink>,
        fallback: FallbackPicker,
    ) -> Self {
        info!("Creating turn controller");
        let state = TurnState::new(mode);
        let (updates, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                provider,
                sink,
                fallback: Mutex::new(fallback),
                updates,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TurnState {
        self.lock_state().clone()
    }

    /// Receiver that sees every published state.
    pub fn subscribe(&self) -> watch::Receiver<TurnState> {
        self.inner.updates.subscribe()
    }

    /// Places the active mark at `index` for the human whose turn it is.
    ///
    /// Ignored when the game is over, an automated move is pending, or the
    /// cell is taken. When the move hands the turn to the automated player,
    /// the provider is asked on a spawned task whose handle is returned.
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(self))]
    pub fn apply(&self, index: usize) -> Option<JoinHandle<()>> {
        let request = {
            let mut state = self.lock_state();
            let placement = state.apply_human(index)?;
            let request = state.begin_automated();
            self.publish(&state);
            self.emit(GameEvent::HumanMove {
                index: placement.index,
                mark: placement.mark,
            });
            self.emit_terminal(&placement);
            request
        };

        request.map(|request| {
            let controller = self.clone();
            tokio::spawn(async move { controller.run_automated(request).await })
        })
    }

    /// Starts a fresh game in the current mode.
    ///
    /// An automated move still in flight is discarded when it arrives.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.reset();
        self.publish(&state);
        self.emit(GameEvent::Reset);
    }

    /// Switches mode and starts a fresh game.
    #[instrument(skip(self))]
    pub fn set_mode(&self, mode: GameMode) {
        let mut state = self.lock_state();
        state.set_mode(mode);
        self.publish(&state);
        self.emit(GameEvent::Reset);
    }

    /// Asks the provider, validates, falls back if needed, and resolves.
    #[instrument(skip(self, request), fields(generation = request.generation()))]
    async fn run_automated(&self, request: AutomatedRequest) {
        let board = *request.board();
        let chosen = choose_move(self.inner.provider.as_ref(), &board, |b| self.fallback_move(b)).await;
        let suggestion = chosen.map(|(suggestion, source)| {
            debug!(index = suggestion.index, %source, "Automated move chosen");
            suggestion
        });

        let mut state = self.lock_state();
        let resolution = match suggestion {
            Some(suggestion) => state.resolve_automated(&request, suggestion),
            None => state.abandon_automated(&request),
        };

        match resolution {
            Resolution::Applied(placement) => {
                self.publish(&state);
                self.emit(GameEvent::AutomatedMove {
                    index: placement.index,
                    mark: placement.mark,
                    annotation: state.annotation().unwrap_or_default().to_string(),
                });
                self.emit_terminal(&placement);
            }
            Resolution::Occupied => {
                self.publish(&state);
                debug!("Automated move target taken, not placed");
            }
            Resolution::Abandoned => {
                self.publish(&state);
                debug!("No automated move available");
            }
            Resolution::Stale => debug!("Automated move arrived after reset, dropped"),
        }
    }

    fn fallback_move(&self, board: &Board) -> Option<MoveSuggestion> {
        self.inner
            .fallback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pick(board)
    }

    fn lock_state(&self) -> MutexGuard<'_, TurnState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &TurnState) {
        self.inner.updates.send_replace(state.clone());
    }

    fn emit(&self, event: GameEvent) {
        self.inner.sink.notify(&event);
    }

    fn emit_terminal(&self, placement: &Placement) {
        match placement.outcome {
            Outcome::Win { mark, line } => self.emit(GameEvent::Win { mark, line }),
            Outcome::Draw => self.emit(GameEvent::Draw),
            Outcome::InProgress => {}
        }
    }
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("state", &*self.lock_state())
            .field("provider", &self.inner.provider.name())
            .finish_non_exhaustive()
    }
}
