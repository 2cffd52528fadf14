//! Session controller: setup, turn routing and bot scheduling.
//!
//! The controller is the only owner of the [`Game`]. Human clicks and bot
//! replies both end in [`Game::apply_move`]. Bot work is tracked by an
//! [`AiTicket`]; a reply whose ticket is no longer pending (the player went
//! home, started a new round, or the reply is a duplicate) is discarded.

use crate::ai_move::{AiMoveError, MoveProvider, paced_move, random_legal_move};
use crate::bot_config::BotConfig;
use duotoe_tictactoe::{
    Board, Game, GameMode, GameStatus, MoveError, MoveOutcome, Player, PlayerNames, Position,
    SessionConfig,
};
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Mode, side and name selection.
    Home,
    /// A round is on the board (possibly finished).
    Game,
}

/// Identity of one bot turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AiTicket {
    round: u64,
    ply: usize,
    symbol: Player,
}

impl AiTicket {
    /// The symbol the bot is moving for.
    pub fn symbol(&self) -> Player {
        self.symbol
    }
}

/// Everything a background task needs to compute one bot move.
#[derive(Debug, Clone)]
pub struct AiRequest {
    /// Ticket to hand back with the result.
    pub ticket: AiTicket,
    /// Board snapshot at request time.
    pub board: Board,
    /// The bot's symbol.
    pub symbol: Player,
    /// Minimum visible thinking time.
    pub thinking_delay: Duration,
}

impl AiRequest {
    /// Runs the request against `provider`, honouring the thinking delay.
    pub async fn run(&self, provider: &dyn MoveProvider) -> Result<Position, AiMoveError> {
        paced_move(provider, &self.board, self.symbol, self.thinking_delay).await
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral information.
    Info,
    /// Something worth celebrating.
    Success,
    /// A recovered problem.
    Error,
}

/// Short-lived message for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the player.
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Notice shown when the bot's reply could not be used.
pub const BOT_CONFUSED: &str = "Bot got confused! Making a random move.";

/// Minimum thinking time for bot moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    /// Delay before the bot's move on an empty board.
    pub opening: Duration,
    /// Delay before every other bot move.
    pub regular: Duration,
}

impl Pacing {
    /// No artificial delay.
    pub fn none() -> Self {
        Self::default()
    }

    fn delay_for(&self, board: &Board) -> Duration {
        if board.empty_positions().len() == 9 {
            self.opening
        } else {
            self.regular
        }
    }
}

impl From<&BotConfig> for Pacing {
    fn from(config: &BotConfig) -> Self {
        Self {
            opening: config.thinking_delay(true),
            regular: config.thinking_delay(false),
        }
    }
}

/// Orchestrates a play session.
#[derive(Debug)]
pub struct SessionController {
    game: Option<Game>,
    round: u64,
    pending_ai: Option<AiTicket>,
    notices: VecDeque<Notice>,
    pacing: Pacing,
}

impl SessionController {
    /// Creates a controller on the home screen.
    #[instrument]
    pub fn new(pacing: Pacing) -> Self {
        info!("Creating session controller");
        Self {
            game: None,
            round: 0,
            pending_ai: None,
            notices: VecDeque::new(),
            pacing,
        }
    }

    /// The current screen.
    pub fn view(&self) -> View {
        if self.game.is_some() {
            View::Game
        } else {
            View::Home
        }
    }

    /// The game, when one is on the board.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Whether a bot move is being computed.
    pub fn is_thinking(&self) -> bool {
        self.pending_ai.is_some()
    }

    /// The pending bot ticket, if any.
    pub fn pending_ticket(&self) -> Option<AiTicket> {
        self.pending_ai
    }

    /// Starts a session from setup-form input.
    ///
    /// See [`PlayerNames::resolve`] for how names are filled in.
    #[instrument(skip(self, player_one, player_two))]
    pub fn start(&mut self, mode: GameMode, human_side: Player, player_one: &str, player_two: &str) {
        let names = PlayerNames::resolve(mode, human_side, player_one, player_two);
        self.start_session(SessionConfig::new(mode, human_side, names));
    }

    /// Starts a session with zeroed scores.
    #[instrument(skip(self, config), fields(mode = ?config.mode()))]
    pub fn start_session(&mut self, config: SessionConfig) {
        match self.game.as_mut() {
            Some(game) => game.start_session(config),
            None => self.game = Some(Game::new(config)),
        }
        self.next_round();
        info!(round = self.round, "Session started");
    }

    /// Routes a human click to the game.
    ///
    /// # Errors
    ///
    /// Clicks are refused without any state change when no game is on the
    /// board, a bot move is pending, the side to move belongs to the bot,
    /// or the move itself is illegal. The UI ignores these.
    #[instrument(skip(self))]
    pub fn click(&mut self, position: Position) -> Result<MoveOutcome, MoveError> {
        let pending = self.pending_ai.is_some();
        let game = self.game.as_mut().ok_or(MoveError::NoGame)?;

        if game.status().is_terminal() {
            return Err(MoveError::GameOver);
        }
        if pending {
            debug!("Click ignored while bot is thinking");
            return Err(MoveError::AwaitingBot);
        }
        if game.is_ai_turn() {
            debug!("Click ignored on bot's turn");
            return Err(MoveError::NotHumanTurn);
        }

        let mover = game.to_move();
        game.apply_move(position, mover).inspect_err(|e| {
            debug!(error = %e, "Click rejected");
        })
    }

    /// Claims the current bot turn.
    ///
    /// Returns `None` unless it is the bot's turn and no bot move is
    /// already pending, so at most one request is in flight per turn.
    #[instrument(skip(self))]
    pub fn begin_ai_turn(&mut self) -> Option<AiRequest> {
        if self.pending_ai.is_some() {
            return None;
        }
        let game = self.game.as_ref()?;
        if !game.is_ai_turn() {
            return None;
        }
        let symbol = game.to_move();

        let ticket = AiTicket {
            round: self.round,
            ply: game.round().ply(),
            symbol,
        };
        self.pending_ai = Some(ticket);

        let board = *game.board();
        let thinking_delay = self.pacing.delay_for(&board);
        debug!(?ticket, ?thinking_delay, "Bot turn started");

        Some(AiRequest {
            ticket,
            board,
            symbol,
            thinking_delay,
        })
    }

    /// Applies the bot's reply for `ticket`.
    ///
    /// Replies for any ticket other than the pending one are dropped and
    /// `None` is returned. A failed reply is replaced by a random legal move
    /// and an error notice is queued.
    #[instrument(skip(self, result, rng))]
    pub fn complete_ai_turn<R: Rng + ?Sized>(
        &mut self,
        ticket: AiTicket,
        result: Result<Position, AiMoveError>,
        rng: &mut R,
    ) -> Option<MoveOutcome> {
        if self.pending_ai != Some(ticket) {
            debug!(?ticket, pending = ?self.pending_ai, "Discarding stale bot reply");
            return None;
        }
        self.pending_ai = None;

        let game = self.game.as_mut()?;

        match result {
            Ok(position) => match game.apply_move(position, ticket.symbol) {
                Ok(outcome) => {
                    info!(%position, "Bot moved");
                    return Some(outcome);
                }
                Err(e) => warn!(error = %e, %position, "Bot move rejected"),
            },
            Err(e) => warn!(error = %e, "Bot failed to move"),
        }

        self.notices
            .push_back(Notice::new(NoticeLevel::Error, BOT_CONFUSED));

        let fallback = random_legal_move(game.board(), rng)?;
        info!(position = %fallback, "Bot plays random fallback");
        game.apply_move(fallback, ticket.symbol).ok()
    }

    /// Runs one bot turn to completion, if it is the bot's turn.
    pub async fn play_ai_turn<R: Rng + ?Sized>(
        &mut self,
        provider: &dyn MoveProvider,
        rng: &mut R,
    ) -> Option<MoveOutcome> {
        let request = self.begin_ai_turn()?;
        let result = request.run(provider).await;
        self.complete_ai_turn(request.ticket, result, rng)
    }

    /// Starts the next round with sides and names swapped. Scores are kept.
    ///
    /// Only available once the round has finished; returns whether a new
    /// round started.
    #[instrument(skip(self))]
    pub fn play_again(&mut self) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        if !game.status().is_terminal() {
            return false;
        }

        game.swap_sides_for_next_round();

        let message = match game.config().mode() {
            GameMode::HumanVsAi => {
                if *game.config().human_side() == Player::X {
                    "You play as X (First)".to_string()
                } else {
                    "Bot plays as X (First)".to_string()
                }
            }
            GameMode::HumanVsHuman => {
                format!("Swapping sides! {} is now X.", game.name_of(Player::X))
            }
        };
        self.notices
            .push_back(Notice::new(NoticeLevel::Success, message));

        self.next_round();
        true
    }

    /// Leaves the session and returns to setup.
    #[instrument(skip(self))]
    pub fn go_home(&mut self) {
        info!("Returning to setup");
        self.game = None;
        self.next_round();
    }

    /// Queued notices, oldest first. The queue is emptied.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// One-line status for the game screen.
    pub fn status_message(&self) -> String {
        let Some(game) = self.game.as_ref() else {
            return String::new();
        };
        if game.status().is_terminal() {
            "Game Over".to_string()
        } else if self.is_thinking() {
            "Bot is thinking...".to_string()
        } else {
            format!("{}'s Turn", game.name_of(game.to_move()))
        }
    }

    /// Headline and detail for a finished round.
    pub fn round_summary(&self) -> Option<(String, String)> {
        let game = self.game.as_ref()?;
        match game.status() {
            GameStatus::Playing => None,
            GameStatus::Draw => Some((
                "It's a Draw!".to_string(),
                "Great minds think alike.".to_string(),
            )),
            GameStatus::Won => {
                let winner = game.winning_line()?.winner;
                let name = game.name_of(winner);
                Some((
                    format!("{} Wins!", name),
                    format!("{} ({}) takes the round!", name, winner),
                ))
            }
        }
    }

    /// Invalidates outstanding bot work and advances the round counter.
    fn next_round(&mut self) {
        if let Some(ticket) = self.pending_ai.take() {
            debug!(?ticket, "Dropping pending bot turn");
        }
        self.round += 1;
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Pacing::none())
    }
}
