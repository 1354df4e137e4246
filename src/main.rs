//! Tic-Tac-Toe Arcade - Unified CLI
//!
//! Terminal game plus a one-shot move query for scripting.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use tictactoe_arcade::{
    AppConfig, Board, FallbackPicker, LlmMoveProvider, MoveProvider, TimedProvider, choose_move,
    evaluate, tui,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            mode,
            seed,
            muted,
        } => {
            initialize_file_tracing()?;
            let mut config = AppConfig::load_or_default(&config)?;
            if let Some(mode) = mode {
                config = config.with_mode(mode.into());
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if muted {
                config = config.with_muted(true);
            }
            tui::run_tui(config).await
        }
        Command::Suggest {
            board,
            config,
            seed,
        } => {
            initialize_stderr_tracing();
            run_suggest(board, &config, seed).await
        }
    }
}

/// Asks the configured provider for one move and prints it.
#[instrument(skip(board))]
async fn run_suggest(board: Board, config_path: &Path, seed: Option<u64>) -> Result<()> {
    if evaluate(&board).is_terminal() {
        bail!("game is already over on this board");
    }

    let config = AppConfig::load_or_default(config_path)?;
    let llm = LlmMoveProvider::from_config(&config);
    let name = llm.name().to_string();
    let provider = TimedProvider::new(llm, config.provider_timeout());

    let mut picker = match seed.or(*config.seed()) {
        Some(seed) => FallbackPicker::seeded(seed),
        None => FallbackPicker::from_entropy(),
    };

    let Some((suggestion, source)) = choose_move(&provider, &board, |b| picker.pick(b)).await
    else {
        bail!("no empty cell to play");
    };
    info!(index = suggestion.index, %source, "Move chosen");

    let out = serde_json::json!({
        "move": suggestion.index,
        "comment": suggestion.annotation,
        "source": source,
        "provider": name,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Logs to a file so the TUI owns the terminal.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create("tictactoe_arcade.log")?;
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tictactoe_arcade=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .try_init();
    Ok(())
}

fn initialize_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}
