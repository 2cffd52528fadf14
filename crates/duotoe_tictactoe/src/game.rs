//! Game state machine for a session of tic-tac-toe rounds.

use super::action::{Move, MoveError};
use super::round::{GameStatus, MoveOutcome, Round};
use super::rules::WinningLine;
use super::session::{PlayerNames, Scores, SessionConfig};
use super::{Board, Player, Position};
use tracing::{debug, info, instrument};

/// Tic-tac-toe state machine.
///
/// Owns the current [`Round`], the cumulative [`Scores`] and the
/// [`SessionConfig`] (mode, side assignment, names). Every change to the
/// board goes through [`Game::apply_move`], whoever is moving.
///
/// Status only moves forward from `Playing` to `Won` or `Draw`; the round
/// returns to `Playing` through [`Game::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    config: SessionConfig,
    round: Round,
    scores: Scores,
}

impl Game {
    /// Starts a session with `config`.
    #[instrument(skip(config), fields(mode = ?config.mode(), human_side = %config.human_side()))]
    pub fn new(config: SessionConfig) -> Self {
        info!("Starting new session");
        Self {
            config,
            round: Round::new(),
            scores: Scores::new(),
        }
    }

    /// Replaces the session: zeroes scores, resets the round and stores
    /// the new configuration.
    #[instrument(skip(self, config), fields(mode = ?config.mode(), human_side = %config.human_side()))]
    pub fn start_session(&mut self, config: SessionConfig) {
        info!("Restarting session");
        self.scores = Scores::new();
        self.config = config;
        self.reset();
    }

    /// Places `player`'s mark at `position`.
    ///
    /// On a win or draw the matching score counter is incremented.
    ///
    /// # Errors
    ///
    /// Rejected moves leave the game untouched; see [`Round::play`].
    #[instrument(skip(self), fields(ply = self.round.ply()))]
    pub fn apply_move(
        &mut self,
        position: Position,
        player: Player,
    ) -> Result<MoveOutcome, MoveError> {
        let (next, outcome) = self.round.play(Move::new(player, position))?;
        self.round = next;
        self.scores.record(&outcome);

        match outcome {
            MoveOutcome::Won(line) => {
                info!(winner = %line.winner, line = ?line.indices(), "Round won");
            }
            MoveOutcome::Draw => info!("Round drawn"),
            MoveOutcome::Continue => debug!(to_move = %self.round.to_move(), "Turn passed"),
        }

        Ok(outcome)
    }

    /// Clears the board for a new round. X moves first. Scores untouched.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Resetting round");
        self.round = Round::new();
    }

    /// Flips the human's side and swaps the names, then resets.
    ///
    /// Each person keeps their display name while changing symbol, so
    /// applying this twice restores the original mapping.
    #[instrument(skip(self), fields(human_side = %self.config.human_side()))]
    pub fn swap_sides_for_next_round(&mut self) {
        self.config = self.config.swapped();
        info!(
            human_side = %self.config.human_side(),
            x = %self.config.names().x(),
            o = %self.config.names().o(),
            "Sides swapped"
        );
        self.reset();
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current round.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        self.round.board()
    }

    /// The player allowed to move next.
    pub fn to_move(&self) -> Player {
        self.round.to_move()
    }

    /// Returns the round status.
    pub fn status(&self) -> GameStatus {
        self.round.status()
    }

    /// The completed line when the round is won.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.round.winning_line()
    }

    /// Returns the session scores.
    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    /// Returns the name mapping.
    pub fn names(&self) -> &PlayerNames {
        self.config.names()
    }

    /// Display name of whoever holds `player`.
    pub fn name_of(&self, player: Player) -> &str {
        self.config.names().name_of(player)
    }

    /// The bot's symbol, if the bot is playing.
    pub fn ai_side(&self) -> Option<Player> {
        self.config.ai_side()
    }

    /// Whether the bot should move now.
    pub fn is_ai_turn(&self) -> bool {
        self.status() == GameStatus::Playing && self.ai_side() == Some(self.to_move())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
