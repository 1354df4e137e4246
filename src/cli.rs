//! Command-line interface for tictactoe_arcade.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tictactoe_arcade::{Board, Cell, GameMode, Mark};

/// Tic-Tac-Toe Arcade - play against a friend or a language model
#[derive(Parser, Debug)]
#[command(name = "tictactoe_arcade")]
#[command(about = "Terminal tic-tac-toe with an LLM opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Path to config file
        #[arg(short, long, default_value = "tictactoe.toml")]
        config: PathBuf,

        /// Starting mode (overrides the config file)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Seed for the fallback move picker
        #[arg(long)]
        seed: Option<u64>,

        /// Start with the chime muted
        #[arg(long)]
        muted: bool,
    },

    /// Ask the configured provider for one move and print it as JSON
    Suggest {
        /// Board as nine comma-separated cells: X, O or _ (row-major)
        #[arg(long, value_parser = parse_board)]
        board: Board,

        /// Path to config file
        #[arg(short, long, default_value = "tictactoe.toml")]
        config: PathBuf,

        /// Seed for the fallback move picker
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Mode names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Two humans on one keyboard
    #[value(alias = "local")]
    Pvp,
    /// Human (X) against the automated player (O)
    #[value(alias = "automated")]
    Ai,
}

impl From<ModeArg> for GameMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pvp => GameMode::LocalPvp,
            ModeArg::Ai => GameMode::PvAutomated,
        }
    }
}

/// Parses `X,O,_,...` into a board.
///
/// Empty cells may be written as `_`, `-`, `.` or left blank.
pub fn parse_board(s: &str) -> Result<Board, String> {
    let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
    if tokens.len() != 9 {
        return Err(format!("expected 9 cells, got {}", tokens.len()));
    }

    let mut cells = [Cell::Empty; 9];
    for (i, token) in tokens.iter().enumerate() {
        cells[i] = match token.to_ascii_uppercase().as_str() {
            "X" => Cell::Occupied(Mark::X),
            "O" => Cell::Occupied(Mark::O),
            "" | "_" | "-" | "." => Cell::Empty,
            other => return Err(format!("cell {}: unknown symbol '{}'", i + 1, other)),
        };
    }
    Ok(Board::from_cells(cells))
}
