//! duotoe - unified CLI.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use duotoe::{BotConfig, LlmProvider, Player, get_move, parse_board, random_legal_move};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Play {
        config: PathBuf::from("duotoe.toml"),
        log_file: PathBuf::from("duotoe.log"),
        provider: None,
        model: None,
    }) {
        Command::Play {
            config,
            log_file,
            provider,
            model,
        } => {
            let config = load_config(&config, provider, model)?;
            duotoe::run_tui(config, log_file).await
        }
        Command::Suggest {
            board,
            symbol,
            config,
            provider,
            model,
        } => {
            init_stderr_tracing();
            let config = load_config(&config, provider, model)?;
            run_suggest(&config, &board, symbol.as_deref()).await
        }
    }
}

/// Loads the bot config and applies command-line overrides.
#[instrument(skip(path), fields(path = %path.display()))]
fn load_config(
    path: &Path,
    provider: Option<LlmProvider>,
    model: Option<String>,
) -> Result<BotConfig> {
    let mut config = BotConfig::load_or_default(path)?;
    if let Some(provider) = provider {
        info!(?provider, "Overriding provider");
        config = config.with_llm_provider(provider);
    }
    if let Some(model) = model {
        info!(%model, "Overriding model");
        config = config.with_llm_model(model);
    }
    Ok(config)
}

/// Asks the bot for a single move and prints it.
#[instrument(skip(config))]
async fn run_suggest(config: &BotConfig, board: &str, symbol: Option<&str>) -> Result<()> {
    let board = parse_board(board)
        .context("Board must be nine comma-separated cells, e.g. X,1,2,3,O,5,6,7,O")?;

    let symbol = match symbol {
        Some(s) => Player::from_symbol(s).context("Symbol must be X or O")?,
        None if board.count(Player::X) > board.count(Player::O) => Player::O,
        None => Player::X,
    };

    let provider = duotoe::provider_from_config(config);
    info!(provider = %provider.name(), %symbol, "Requesting bot move");

    let position = match get_move(provider.as_ref(), &board, symbol).await {
        Ok(position) => position,
        Err(e) => {
            warn!(error = %e, "Bot failed, picking a random move");
            eprintln!("{}", duotoe::BOT_CONFUSED);
            random_legal_move(&board, &mut rand::thread_rng())
                .context("Board is full, no move to make")?
        }
    };

    eprintln!("{}\n", board.place(position, symbol).display());
    println!("{} ({})", position.to_index(), position.label());
    Ok(())
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
