//! Terminal UI for duotoe.

mod app;
mod input;
mod ui;

use crate::ai_move::{AiMoveError, MoveProvider, provider_from_config};
use crate::bot_config::BotConfig;
use crate::controller::{AiTicket, Pacing};
use anyhow::Result;
use app::{App, Flow};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use duotoe_tictactoe::Position;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// How long to wait for a key before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type BotReply = (AiTicket, Result<Position, AiMoveError>);

/// Runs the interactive game until the player quits.
pub async fn run_tui(config: BotConfig, log_file: PathBuf) -> Result<()> {
    // Log to a file so output doesn't tear the screen
    let file = std::fs::File::create(&log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(log_file = %log_file.display(), "Starting duotoe TUI");

    let provider: Arc<dyn MoveProvider> = Arc::from(provider_from_config(&config));
    let mut app = App::new(Pacing::from(&config), provider.name());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &mut app, provider).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("duotoe TUI exited");
    res
}

/// Event loop: apply bot replies, start bot turns, draw, read keys.
#[instrument(skip_all, fields(provider = %provider.name()))]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    provider: Arc<dyn MoveProvider>,
) -> Result<()> {
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<BotReply>();
    let mut in_flight: Option<JoinHandle<()>> = None;

    let result = loop {
        while let Ok((ticket, result)) = reply_rx.try_recv() {
            app.complete_ai_turn(ticket, result);
        }

        // Pending work was invalidated (home, play again)
        if app.session().pending_ticket().is_none()
            && let Some(handle) = in_flight.take()
        {
            debug!("Aborting stale bot request");
            handle.abort();
        }

        if let Some(request) = app.session_mut().begin_ai_turn() {
            let provider = Arc::clone(&provider);
            let reply_tx = reply_tx.clone();
            let handle = tokio::spawn(async move {
                let result = request.run(provider.as_ref()).await;
                // The receiver is gone once the UI has quit
                let _ = reply_tx.send((request.ticket, result));
            });
            if let Some(stale) = in_flight.replace(handle) {
                stale.abort();
            }
        }

        app.tick();

        if let Err(e) = terminal.draw(|f| ui::draw(f, app)) {
            break Err(e.into());
        }

        match poll_key(app) {
            Ok(Flow::Continue) => tokio::task::yield_now().await,
            Ok(Flow::Quit) => {
                info!("User quit");
                break Ok(());
            }
            Err(e) => break Err(e),
        }
    };

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    result
}

fn poll_key(app: &mut App) -> Result<Flow> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(Flow::Continue);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(app.handle_key(key)),
        _ => Ok(Flow::Continue),
    }
}
