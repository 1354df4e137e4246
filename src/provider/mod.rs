//! Move providers for the automated player.
//!
//! A [`MoveProvider`] is untrusted: it may fail, time out, or suggest a cell
//! that is already taken. The turn controller checks every answer and falls
//! back to [`FallbackPicker`] when needed, so providers never need their own
//! fallback logic.

mod fallback;
mod llm;

pub use fallback::{FALLBACK_ANNOTATION, FallbackPicker};
pub use llm::{LlmMoveProvider, parse_suggestion};

use derive_more::{Display, Error};
use std::time::Duration;
use tictactoe_core::{Board, MoveSuggestion};
use tracing::{debug, error, instrument, warn};

/// Source of moves for the automated player.
#[async_trait::async_trait]
pub trait MoveProvider: Send + Sync {
    /// Proposes a move on `board`.
    ///
    /// Callers only ask when the board has at least one empty cell.
    async fn propose_move(&self, board: &Board) -> Result<MoveSuggestion, ProviderError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Why a provider could not supply a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProviderErrorKind {
    /// No credential or configuration.
    #[display("provider unavailable")]
    Unavailable,
    /// Network or remote failure, including timeouts.
    #[display("transport error")]
    Transport,
    /// The reply could not be read as a move.
    #[display("malformed response")]
    MalformedResponse,
}

/// Move provider error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Provider error ({}): {} at {}:{}", kind, message, file, line)]
pub struct ProviderError {
    /// Failure class.
    pub kind: ProviderErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Provider error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an unavailable error.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    /// Creates a transport error.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    /// Creates a malformed-response error.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message)
    }
}

/// Where an automated move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    /// The provider's own suggestion.
    #[display("provider")]
    Provider,
    /// The local fallback.
    #[display("fallback")]
    Fallback,
}

/// Asks `provider` for a move on `board` and checks it.
///
/// A failed request or a suggestion for an occupied or out-of-range cell is
/// replaced by `fallback`. There is no retry. Returns `None` only if the
/// fallback has nothing to offer, which cannot happen on a board with an
/// empty cell.
#[instrument(skip_all, fields(provider = provider.name()))]
pub async fn choose_move(
    provider: &dyn MoveProvider,
    board: &Board,
    fallback: impl FnOnce(&Board) -> Option<MoveSuggestion>,
) -> Option<(MoveSuggestion, MoveSource)> {
    match provider.propose_move(board).await {
        Ok(suggestion) if suggestion.is_playable_on(board) => {
            debug!(index = suggestion.index, "Provider suggestion accepted");
            return Some((suggestion, MoveSource::Provider));
        }
        Ok(suggestion) => {
            warn!(index = suggestion.index, "Provider suggested an unplayable cell, using fallback");
        }
        Err(e) => {
            warn!(error = %e, kind = %e.kind, "Provider failed, using fallback");
        }
    }
    fallback(board).map(|suggestion| (suggestion, MoveSource::Fallback))
}

/// Wraps a provider with a deadline; expiry is a transport error.
#[derive(Debug, Clone)]
pub struct TimedProvider<P> {
    inner: P,
    timeout: Duration,
}

impl<P> TimedProvider<P> {
    /// Wraps `inner` so each call gives up after `timeout`.
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait::async_trait]
impl<P: MoveProvider> MoveProvider for TimedProvider<P> {
    #[instrument(skip(self, board), fields(provider = self.inner.name(), timeout_ms = self.timeout.as_millis() as u64))]
    async fn propose_move(&self, board: &Board) -> Result<MoveSuggestion, ProviderError> {
        match tokio::time::timeout(self.timeout, self.inner.propose_move(board)).await {
            Ok(result) => {
                debug!(ok = result.is_ok(), "Provider answered in time");
                result
            }
            Err(_) => {
                warn!("Provider timed out");
                Err(ProviderError::transport(format!(
                    "{} did not answer within {:?}",
                    self.inner.name(),
                    self.timeout
                )))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
