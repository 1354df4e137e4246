//! Game event notifications.
//!
//! The controller reports what happened through a [`NotificationSink`]. Sinks
//! are fire-and-forget: they return nothing and must not block.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tictactoe_core::{Line, Mark};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

/// Discrete things the controller reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A human placed a mark.
    HumanMove {
        /// Cell index.
        index: usize,
        /// Mark placed.
        mark: Mark,
    },
    /// The automated player placed a mark.
    AutomatedMove {
        /// Cell index.
        index: usize,
        /// Mark placed.
        mark: Mark,
        /// Comment shown with the move.
        annotation: String,
    },
    /// Game won.
    Win {
        /// Winning mark.
        mark: Mark,
        /// Completed line.
        line: Line,
    },
    /// Game drawn.
    Draw,
    /// Board cleared.
    Reset,
}

/// Receiver of game events.
///
/// The controller calls `notify` while holding its state lock, so an
/// implementation must return promptly and must not call back into the
/// controller.
pub trait NotificationSink: Send + Sync {
    /// Handles one event. Must return promptly.
    fn notify(&self, event: &GameEvent);
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: &GameEvent) {}
}

/// Logs every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &GameEvent) {
        info!(?event, "Game event");
    }
}

/// Forwards events to a channel.
///
/// A closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver it feeds.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, event: &GameEvent) {
        if self.tx.send(event.clone()).is_err() {
            trace!("Event receiver dropped");
        }
    }
}

/// Plays cues on the terminal bell.
///
/// Each event has its own pattern of rings. The mute flag belongs to this
/// sink; the controller never looks at it.
pub struct ChimeSink {
    muted: AtomicBool,
    out: std::sync::Mutex<Box<dyn Write + Send>>,
}

impl ChimeSink {
    /// Rings on stdout.
    pub fn stdout(muted: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), muted)
    }

    /// Rings on an arbitrary writer.
    pub fn with_writer(out: Box<dyn Write + Send>, muted: bool) -> Self {
        Self {
            muted: AtomicBool::new(muted),
            out: std::sync::Mutex::new(out),
        }
    }

    /// Sets the mute flag.
    pub fn set_muted(&self, muted: bool) {
        debug!(muted, "Chime mute changed");
        self.muted.store(muted, Ordering::Relaxed);
    }

    /// Flips the mute flag and returns the new value.
    pub fn toggle_muted(&self) -> bool {
        let muted = !self.muted.fetch_xor(true, Ordering::Relaxed);
        debug!(muted, "Chime mute toggled");
        muted
    }

    /// Current mute flag.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    fn rings(event: &GameEvent) -> usize {
        match event {
            GameEvent::HumanMove { .. } | GameEvent::AutomatedMove { .. } => 1,
            GameEvent::Reset => 1,
            GameEvent::Draw => 2,
            GameEvent::Win { .. } => 3,
        }
    }
}

impl NotificationSink for ChimeSink {
    fn notify(&self, event: &GameEvent) {
        if self.is_muted() {
            return;
        }
        let Ok(mut out) = self.out.try_lock() else {
            trace!("Chime writer busy, skipping cue");
            return;
        };
        let cue = "\x07".repeat(Self::rings(event));
        if let Err(e) = out.write_all(cue.as_bytes()).and_then(|()| out.flush()) {
            trace!(error = %e, "Chime failed");
        }
    }
}

impl std::fmt::Debug for ChimeSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChimeSink")
            .field("muted", &self.is_muted())
            .finish_non_exhaustive()
    }
}

/// Sends each event to several sinks in order.
#[derive(Clone, Default)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl SinkSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl NotificationSink for SinkSet {
    fn notify(&self, event: &GameEvent) {
        for sink in &self.sinks {
            sink.notify(event);
        }
    }
}
