//! duotoe - tic-tac-toe in the terminal, against a friend or an LLM bot.
//!
//! # Architecture
//!
//! - **Controller**: session state machine routing human clicks and bot
//!   replies into the [`Game`]
//! - **Bot**: [`MoveProvider`] implementations that ask an LLM (Gemini,
//!   OpenAI, Anthropic) for a move, with validation and random fallback
//! - **TUI**: ratatui front end driving the controller
//!
//! # Example
//!
//! ```
//! use duotoe::{GameMode, Pacing, Player, Position, SessionController, View};
//!
//! let mut session = SessionController::new(Pacing::none());
//! session.start(GameMode::HumanVsHuman, Player::X, "Ada", "Grace");
//! assert_eq!(session.view(), View::Game);
//!
//! session.click(Position::Center).unwrap();
//! assert_eq!(session.status_message(), "Grace's Turn");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ai_move;
mod bot_config;
mod controller;
mod llm_client;
mod tui;

// Crate-level exports - Bot configuration
pub use bot_config::{BotConfig, ConfigError, default_model};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider, ResponseSchema, gemini_schema};

// Crate-level exports - Bot moves
pub use ai_move::{
    AiMoveError, LlmMoveProvider, MoveProvider, MoveSuggestion, OfflineProvider, SYSTEM_PROMPT,
    get_move, move_schema, paced_move, parse_board, parse_suggestion, provider_from_config,
    random_legal_move, serialize_board, user_prompt, validate_suggestion,
};

// Crate-level exports - Session controller
pub use controller::{
    AiRequest, AiTicket, BOT_CONFUSED, Notice, NoticeLevel, Pacing, SessionController, View,
};

// Crate-level exports - Terminal UI
pub use tui::run_tui;

// Crate-level exports - Game types
pub use duotoe_tictactoe::{
    Board, Game, GameMode, GameStatus, MoveError, MoveOutcome, Player, PlayerNames, Position,
    Scores, SessionConfig, Square, WinningLine,
};
