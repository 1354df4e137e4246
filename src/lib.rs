//! Tic-Tac-Toe Arcade library
//!
//! Plays tic-tac-toe locally or against a language-model opponent whose
//! moves are checked and, when missing or invalid, replaced by a random
//! legal move.
//!
//! # Architecture
//!
//! - **Controller**: owns the game state and runs automated turns
//! - **Provider**: where automated moves come from (LLM or fallback)
//! - **Notify**: fire-and-forget event sinks (logs, terminal chime)
//! - **TUI**: terminal front end reading controller snapshots
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tictactoe_arcade::{
//!     AppConfig, FallbackPicker, GameMode, LlmMoveProvider, TracingSink, TurnController,
//! };
//!
//! # async fn example() {
//! let config = AppConfig::default();
//! let controller = TurnController::new(
//!     GameMode::PvAutomated,
//!     Arc::new(LlmMoveProvider::from_config(&config)),
//!     Arc::new(TracingSink),
//!     FallbackPicker::from_entropy(),
//! );
//! if let Some(reply) = controller.apply(4) {
//!     reply.await.ok();
//! }
//! println!("{:?}", controller.state().board().as_symbols());
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod notify;
mod provider;

pub mod llm_client;
pub mod tui;

pub use config::{AppConfig, ConfigError};
pub use controller::TurnController;
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmErrorKind, LlmProvider};
pub use notify::{ChannelSink, ChimeSink, GameEvent, NotificationSink, NullSink, SinkSet, TracingSink};
pub use provider::{
    FALLBACK_ANNOTATION, FallbackPicker, LlmMoveProvider, MoveProvider, MoveSource, ProviderError,
    ProviderErrorKind, TimedProvider, choose_move, parse_suggestion,
};

pub use tictactoe_core::{
    Board, Cell, GameMode, HUMAN_MARK, LINES, Line, Mark, MoveSuggestion, Outcome, Position,
    TurnState, evaluate,
};
