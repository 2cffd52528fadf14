//! Pure tic-tac-toe game logic.
//!
//! This crate holds everything about the game that does not need I/O:
//!
//! - **Board**: an immutable 3x3 value; placing a mark yields a new board
//! - **Rules**: win detection over the 8 fixed lines, draw detection
//! - **Round**: one playthrough from empty board to a terminal status
//! - **Game**: the state machine that owns the round, scores, names and
//!   side assignment for a session
//!
//! # Example
//!
//! ```
//! use duotoe_tictactoe::{Game, GameMode, Player, PlayerNames, Position, SessionConfig};
//!
//! let config = SessionConfig::new(
//!     GameMode::HumanVsHuman,
//!     Player::X,
//!     PlayerNames::new("Ada", "Grace"),
//! );
//! let mut game = Game::new(config);
//! game.apply_move(Position::Center, Player::X).unwrap();
//! assert_eq!(game.to_move(), Player::O);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod position;
mod round;
pub mod rules;
mod session;
mod types;

pub use action::{Move, MoveError};
pub use game::Game;
pub use position::Position;
pub use round::{GameStatus, MoveOutcome, Round};
pub use rules::{WinningLine, detect_winner, is_draw, is_full, WINNING_LINES};
pub use session::{GameMode, PlayerNames, Scores, SessionConfig};
pub use types::{Board, Player, Square};
