//! A single round: one playthrough from empty board to a terminal status.

use super::action::{Move, MoveError};
use super::rules::{WinningLine, detect_winner, is_full};
use super::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Current status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are being accepted.
    #[default]
    Playing,
    /// A player completed a line.
    Won,
    /// The board filled up with no line.
    Draw,
}

impl GameStatus {
    /// Whether the round has ended.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

/// What a successful move did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Play continues; the turn passed to the other player.
    Continue,
    /// The move completed a line.
    Won(WinningLine),
    /// The move filled the board with no line.
    Draw,
}

/// Board, turn and status of one round.
///
/// `Round` is a value: [`Round::play`] returns the next round and leaves
/// `self` unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    board: Board,
    to_move: Player,
    status: GameStatus,
    winning_line: Option<WinningLine>,
}

impl Round {
    /// A fresh round: empty board, X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::X,
            status: GameStatus::Playing,
            winning_line: None,
        }
    }

    /// Resumes play from an arbitrary board with `to_move` next.
    ///
    /// The status is derived from the board.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let winning_line = detect_winner(&board);
        let status = if winning_line.is_some() {
            GameStatus::Won
        } else if is_full(&board) {
            GameStatus::Draw
        } else {
            GameStatus::Playing
        };
        Self {
            board,
            to_move,
            status,
            winning_line,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player allowed to move next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the round status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The completed line, set only when the status is `Won`.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.winning_line
    }

    /// The winner, set only when the status is `Won`.
    pub fn winner(&self) -> Option<Player> {
        self.winning_line.map(|line| line.winner)
    }

    /// Number of marks on the board.
    pub fn ply(&self) -> usize {
        self.board.count(Player::X) + self.board.count(Player::O)
    }

    /// Plays a move, returning the next round and what happened.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if the round has ended
    /// - [`MoveError::WrongPlayer`] if `action.player` is not to move
    /// - [`MoveError::SquareOccupied`] if the cell is taken
    #[instrument(skip(self), fields(to_move = %self.to_move, status = ?self.status))]
    pub fn play(&self, action: Move) -> Result<(Round, MoveOutcome), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if action.player != self.to_move {
            return Err(MoveError::WrongPlayer(action.player));
        }
        if !self.board.is_empty(action.position) {
            return Err(MoveError::SquareOccupied(action.position));
        }

        let board = self.board.place(action.position, action.player);

        if let Some(line) = detect_winner(&board) {
            debug!(winner = %line.winner, line = ?line.indices(), "Line completed");
            return Ok((
                Round {
                    board,
                    to_move: self.to_move,
                    status: GameStatus::Won,
                    winning_line: Some(line),
                },
                MoveOutcome::Won(line),
            ));
        }

        if is_full(&board) {
            debug!("Board full with no line");
            return Ok((
                Round {
                    board,
                    to_move: self.to_move,
                    status: GameStatus::Draw,
                    winning_line: None,
                },
                MoveOutcome::Draw,
            ));
        }

        Ok((
            Round {
                board,
                to_move: self.to_move.opponent(),
                status: GameStatus::Playing,
                winning_line: None,
            },
            MoveOutcome::Continue,
        ))
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}
