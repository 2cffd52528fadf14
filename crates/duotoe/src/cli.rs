//! Command-line interface for duotoe.

use duotoe::LlmProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// duotoe - tic-tac-toe against a friend or an LLM-backed bot
#[derive(Parser, Debug)]
#[command(name = "duotoe")]
#[command(about = "Terminal tic-tac-toe against a friend or an LLM bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the terminal UI
    Play {
        /// Path to the bot configuration file
        #[arg(short, long, default_value = "duotoe.toml")]
        config: PathBuf,

        /// File receiving log output while the UI owns the terminal
        #[arg(long, default_value = "duotoe.log")]
        log_file: PathBuf,

        /// Override the configured LLM provider
        #[arg(long, value_enum)]
        provider: Option<LlmProvider>,

        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },

    /// Ask the bot for one move and print the chosen index
    Suggest {
        /// Board as nine comma-separated cells: X, O, or the cell's index
        #[arg(short, long)]
        board: String,

        /// Symbol the bot plays (inferred from the board when omitted)
        #[arg(short, long)]
        symbol: Option<String>,

        /// Path to the bot configuration file
        #[arg(short, long, default_value = "duotoe.toml")]
        config: PathBuf,

        /// Override the configured LLM provider
        #[arg(long, value_enum)]
        provider: Option<LlmProvider>,

        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },
}
