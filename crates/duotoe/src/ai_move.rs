//! Bot move selection backed by an LLM.
//!
//! A [`MoveProvider`] returns the raw suggestion; [`get_move`] validates it
//! against the board. Callers that receive an error fall back to
//! [`random_legal_move`].

use crate::bot_config::BotConfig;
use crate::llm_client::{LlmClient, LlmError, ResponseSchema};
use async_trait::async_trait;
use duotoe_tictactoe::{Board, Player, Position, Square};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// The JSON object the bot answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSuggestion {
    /// Suggested board index. Out-of-range values are tolerated here and
    /// corrected by [`validate_suggestion`].
    #[serde(rename = "bestMoveIndex", deserialize_with = "lenient_index")]
    pub best_move_index: i64,
    /// Short rationale, if the model gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Reads any JSON number as an index. Integral floats (`4.0`) are taken
/// at face value; values that cannot name a square map to `-1`.
fn lenient_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    let index = number
        .as_i64()
        .or_else(|| number.as_u64().map(|_| i64::MAX))
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= 9.0)
                .map(|f| f as i64)
        })
        .unwrap_or(-1);
    Ok(index)
}

/// Why the bot could not produce a move.
#[derive(Debug, Clone, derive_more::Display)]
pub enum AiMoveError {
    /// The provider request failed.
    #[display("Bot request failed: {}", _0)]
    Llm(LlmError),

    /// The reply was not the expected JSON object.
    #[display("Malformed bot reply: {}", _0)]
    MalformedResponse(String),

    /// The provider did not answer in time.
    #[display("Bot did not answer within {}s", _0)]
    Timeout(u64),

    /// No provider is configured.
    #[display("Bot unavailable: {}", _0)]
    Unavailable(String),

    /// The board has no empty square.
    #[display("No legal move available")]
    NoLegalMove,
}

impl std::error::Error for AiMoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AiMoveError::Llm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LlmError> for AiMoveError {
    fn from(err: LlmError) -> Self {
        AiMoveError::Llm(err)
    }
}

/// Source of bot move suggestions.
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Asks for a move for `symbol` on `board`.
    async fn suggest(&self, board: &Board, symbol: Player) -> Result<MoveSuggestion, AiMoveError>;

    /// Returns the provider's display name.
    fn name(&self) -> &str;
}

/// Provider that asks an LLM for the move.
#[derive(Debug, Clone)]
pub struct LlmMoveProvider {
    client: LlmClient,
    timeout: Duration,
    name: String,
}

impl LlmMoveProvider {
    /// Creates a provider over `client`, bounding each call by `timeout`.
    #[instrument(skip(client), fields(model = %client.config().model()))]
    pub fn new(client: LlmClient, timeout: Duration) -> Self {
        let name = format!("{:?}/{}", client.config().provider(), client.config().model());
        info!(provider = %name, "Creating LLM move provider");
        Self {
            client,
            timeout,
            name,
        }
    }
}

#[async_trait]
impl MoveProvider for LlmMoveProvider {
    #[instrument(skip(self, board), fields(provider = %self.name, board = %serialize_board(board)))]
    async fn suggest(&self, board: &Board, symbol: Player) -> Result<MoveSuggestion, AiMoveError> {
        let user = user_prompt(board, symbol);
        let schema = move_schema();

        let text = tokio::time::timeout(
            self.timeout,
            self.client.generate_json(SYSTEM_PROMPT, &user, &schema),
        )
        .await
        .map_err(|_| {
            warn!(timeout_secs = self.timeout.as_secs(), "Bot request timed out");
            AiMoveError::Timeout(self.timeout.as_secs())
        })??;

        let suggestion = parse_suggestion(&text)?;
        debug!(
            index = suggestion.best_move_index,
            reasoning = suggestion.reasoning.as_deref().unwrap_or(""),
            "Bot suggested move"
        );
        Ok(suggestion)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Provider used when no API key is configured. Every request fails, so
/// the bot falls back to random moves.
#[derive(Debug, Clone)]
pub struct OfflineProvider {
    reason: String,
}

impl OfflineProvider {
    /// Creates an offline provider that reports `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MoveProvider for OfflineProvider {
    async fn suggest(&self, _board: &Board, _symbol: Player) -> Result<MoveSuggestion, AiMoveError> {
        Err(AiMoveError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Builds the provider described by `config`.
///
/// Falls back to [`OfflineProvider`] when the API key is missing so a
/// human-vs-bot session can still be played.
#[instrument(skip(config), fields(provider = ?config.llm_provider()))]
pub fn provider_from_config(config: &BotConfig) -> Box<dyn MoveProvider> {
    match config.create_llm_config() {
        Ok(llm) => Box::new(LlmMoveProvider::new(
            LlmClient::new(llm),
            config.request_timeout(),
        )),
        Err(e) => {
            warn!(error = %e, "LLM not configured, bot will play random moves");
            Box::new(OfflineProvider::new(e.message))
        }
    }
}

/// Asks `provider` for a move and validates it against `board`.
///
/// # Errors
///
/// Provider failures are returned unchanged; an out-of-range or occupied
/// suggestion is corrected, not reported.
#[instrument(skip(provider, board), fields(provider = %provider.name()))]
pub async fn get_move(
    provider: &dyn MoveProvider,
    board: &Board,
    symbol: Player,
) -> Result<Position, AiMoveError> {
    let suggestion = provider.suggest(board, symbol).await?;
    validate_suggestion(board, suggestion.best_move_index)
}

/// [`get_move`], taking at least `min_delay` so the bot appears to think.
///
/// The provider call and the delay run concurrently.
#[instrument(skip(provider, board), fields(provider = %provider.name()))]
pub async fn paced_move(
    provider: &dyn MoveProvider,
    board: &Board,
    symbol: Player,
    min_delay: Duration,
) -> Result<Position, AiMoveError> {
    let (result, ()) = tokio::join!(
        get_move(provider, board, symbol),
        tokio::time::sleep(min_delay)
    );
    result
}

/// Accepts `index` if it names an empty square, otherwise substitutes the
/// first empty square in ascending order.
///
/// # Errors
///
/// [`AiMoveError::NoLegalMove`] if the board is full.
#[instrument(skip(board))]
pub fn validate_suggestion(board: &Board, index: i64) -> Result<Position, AiMoveError> {
    let suggested = usize::try_from(index)
        .ok()
        .and_then(Position::from_index)
        .filter(|pos| board.is_empty(*pos));

    match suggested {
        Some(pos) => Ok(pos),
        None => {
            warn!(index, "Bot suggested an illegal move, using first empty square");
            board
                .empty_positions()
                .first()
                .copied()
                .ok_or(AiMoveError::NoLegalMove)
        }
    }
}

/// Picks an empty square uniformly at random.
pub fn random_legal_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.empty_positions().choose(rng).copied()
}

/// Serializes the board for the prompt: symbols for occupied squares, the
/// square's own index for empty ones, comma-separated.
pub fn serialize_board(board: &Board) -> String {
    board
        .squares()
        .iter()
        .enumerate()
        .map(|(idx, square)| match square {
            Square::Empty => idx.to_string(),
            Square::Occupied(p) => p.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the [`serialize_board`] format.
///
/// Cells are `X`, `O`, or anything else for empty (the index, `.`, `-`).
/// Returns `None` unless there are exactly nine cells.
pub fn parse_board(s: &str) -> Option<Board> {
    let cells: Vec<Option<Player>> = s
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(Player::from_symbol)
        .collect();
    let cells: [Option<Player>; 9] = cells.try_into().ok()?;
    Some(Board::from_cells(cells))
}

/// System prompt sent with every bot request.
pub const SYSTEM_PROMPT: &str = "You are an expert Tic-Tac-Toe player. \
Squares are numbered 0-8, left to right and top to bottom. \
Reply with a JSON object only.";

/// Describes the position and the strategy for one bot move.
pub fn user_prompt(board: &Board, symbol: Player) -> String {
    let opponent = symbol.opponent();
    format!(
        "You are playing as '{me}'. '{them}' is your opponent.\n\
         The board is [{board}]; numbers are empty squares.\n\n\
         Choose your move:\n\
         1. If you can win immediately, take that square.\n\
         2. Otherwise, if '{them}' can win on their next move, block it.\n\
         3. Otherwise prefer the center, then a corner, then an edge.\n\n\
         Answer with {{\"bestMoveIndex\": <0-8>, \"reasoning\": \"<short reason>\"}}.",
        me = symbol,
        them = opponent,
        board = serialize_board(board),
    )
}

/// JSON Schema for [`MoveSuggestion`].
pub fn move_schema() -> ResponseSchema {
    ResponseSchema {
        name: "tictactoe_move".to_string(),
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "bestMoveIndex": {
                    "type": "integer",
                    "description": "The index (0-8) of the best move to make."
                },
                "reasoning": {
                    "type": "string",
                    "description": "Short reasoning for the move."
                }
            },
            "required": ["bestMoveIndex"],
            "additionalProperties": false
        }),
    }
}

/// Extracts a [`MoveSuggestion`] from model output.
///
/// Tolerates code fences and text around the JSON object.
///
/// # Errors
///
/// [`AiMoveError::MalformedResponse`] for empty output, no JSON object, or
/// a missing `bestMoveIndex`.
pub fn parse_suggestion(text: &str) -> Result<MoveSuggestion, AiMoveError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AiMoveError::MalformedResponse("empty reply".to_string()));
    }

    let json = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(AiMoveError::MalformedResponse(format!(
                "no JSON object in {:?}",
                trimmed
            )));
        }
    };

    serde_json::from_str(json).map_err(|e| AiMoveError::MalformedResponse(e.to_string()))
}
