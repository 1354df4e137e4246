//! Terminal UI for Tic-Tac-Toe Arcade.
//!
//! A thin rendering layer: it draws whatever [`TurnController::state`]
//! returns and forwards key presses as controller commands.

mod app;
mod input;
mod ui;

pub use app::{App, status_message};
pub use input::{Action, action_for};

use crate::config::AppConfig;
use crate::controller::TurnController;
use crate::notify::{ChimeSink, SinkSet, TracingSink};
use crate::provider::{FallbackPicker, LlmMoveProvider, MoveProvider, TimedProvider};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Builds a controller wired to the configured LLM provider, a chime and the log.
///
/// Returns the controller, the chime (for the mute toggle) and a provider label.
#[instrument(skip(config))]
pub fn build_controller(config: &AppConfig) -> (TurnController, Arc<ChimeSink>, String) {
    let llm = LlmMoveProvider::from_config(config);
    let label = if llm.is_configured() {
        llm.name().to_string()
    } else {
        "offline".to_string()
    };
    let provider = TimedProvider::new(llm, config.provider_timeout());

    let chime = Arc::new(ChimeSink::stdout(*config.muted()));
    let sink = SinkSet::new()
        .with(chime.clone())
        .with(Arc::new(TracingSink));

    let fallback = match config.seed() {
        Some(seed) => FallbackPicker::seeded(*seed),
        None => FallbackPicker::from_entropy(),
    };

    let controller = TurnController::new(
        *config.mode(),
        Arc::new(provider),
        Arc::new(sink),
        fallback,
    );
    (controller, chime, label)
}

/// Runs the TUI until the user quits.
#[instrument(skip(config))]
pub async fn run_tui(config: AppConfig) -> Result<()> {
    info!("Starting Tic-Tac-Toe Arcade TUI");

    let (controller, chime, label) = build_controller(&config);
    let app = App::new(controller, chime, label);

    let mut terminal = ratatui::init();
    let res = run_app(&mut terminal, app).await;
    ratatui::restore();

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

async fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let mut updates = app.controller().subscribe();
    loop {
        let state = updates.borrow_and_update().clone();
        terminal.draw(|f| ui::draw(f, &app, &state))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = action_for(key.code)
            && !app.handle(action)
        {
            info!("Quit requested");
            return Ok(());
        }

        tokio::task::yield_now().await;
    }
}
