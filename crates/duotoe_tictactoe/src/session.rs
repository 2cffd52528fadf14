//! Session context: mode, side assignment, names and scores.

use super::Player;
use super::round::MoveOutcome;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Who is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing the keyboard.
    #[default]
    #[serde(rename = "pvp")]
    HumanVsHuman,
    /// A human against the bot.
    #[serde(rename = "pvai")]
    HumanVsAi,
}

impl GameMode {
    /// Returns the display label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::HumanVsHuman => "PvP Mode",
            Self::HumanVsAi => "PvAI Mode",
        }
    }

    /// Toggles between the two modes.
    pub fn toggle(self) -> Self {
        match self {
            Self::HumanVsHuman => Self::HumanVsAi,
            Self::HumanVsAi => Self::HumanVsHuman,
        }
    }
}

/// Display names keyed by symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct PlayerNames {
    x: String,
    o: String,
}

impl PlayerNames {
    /// Default name for the first human.
    pub const DEFAULT_PLAYER_ONE: &'static str = "Player 1";
    /// Default name for the second human.
    pub const DEFAULT_PLAYER_TWO: &'static str = "Player 2";
    /// Name shown for the bot.
    pub const BOT: &'static str = "Bot";

    /// Creates a name mapping.
    pub fn new(x: impl Into<String>, o: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            o: o.into(),
        }
    }

    /// Maps setup-form input to symbols.
    ///
    /// Player one takes `side`, player two the other symbol. Blank names
    /// fall back to defaults; in [`GameMode::HumanVsAi`] player two is
    /// always the bot.
    #[instrument]
    pub fn resolve(mode: GameMode, side: Player, player_one: &str, player_two: &str) -> Self {
        let one = non_blank(player_one).unwrap_or(Self::DEFAULT_PLAYER_ONE);
        let two = match mode {
            GameMode::HumanVsAi => Self::BOT,
            GameMode::HumanVsHuman => non_blank(player_two).unwrap_or(Self::DEFAULT_PLAYER_TWO),
        };

        match side {
            Player::X => Self::new(one, two),
            Player::O => Self::new(two, one),
        }
    }

    /// Name of whoever holds `player`.
    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    /// The same two names on opposite symbols.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            x: self.o.clone(),
            o: self.x.clone(),
        }
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self::new("Player X", "Player O")
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Session setup chosen on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    mode: GameMode,
    human_side: Player,
    names: PlayerNames,
}

impl SessionConfig {
    /// Creates a session configuration.
    pub fn new(mode: GameMode, human_side: Player, names: PlayerNames) -> Self {
        Self {
            mode,
            human_side,
            names,
        }
    }

    /// The bot's symbol, if the bot is playing.
    pub fn ai_side(&self) -> Option<Player> {
        match self.mode {
            GameMode::HumanVsAi => Some(self.human_side.opponent()),
            GameMode::HumanVsHuman => None,
        }
    }

    /// Opposite side for the human, names swapped to follow their owners.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            mode: self.mode,
            human_side: self.human_side.opponent(),
            names: self.names.swapped(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(GameMode::HumanVsHuman, Player::X, PlayerNames::default())
    }
}

/// Cumulative results for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Getters, Serialize, Deserialize)]
pub struct Scores {
    x: u32,
    o: u32,
    draws: u32,
}

impl Scores {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wins recorded for `player`.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    /// Total finished rounds.
    pub fn rounds(&self) -> u32 {
        self.x + self.o + self.draws
    }

    /// Counts a terminal outcome. `Continue` leaves the scores alone.
    pub fn record(&mut self, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Won(line) => match line.winner {
                Player::X => self.x += 1,
                Player::O => self.o += 1,
            },
            MoveOutcome::Draw => self.draws += 1,
            MoveOutcome::Continue => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_for_blank_names() {
        let names = PlayerNames::resolve(GameMode::HumanVsHuman, Player::X, "  ", "");
        assert_eq!(names, PlayerNames::new("Player 1", "Player 2"));
    }

    #[test]
    fn test_resolve_player_one_as_o() {
        let names = PlayerNames::resolve(GameMode::HumanVsHuman, Player::O, "Bob", "Alice");
        assert_eq!(names.x(), "Alice");
        assert_eq!(names.o(), "Bob");
    }

    #[test]
    fn test_resolve_ignores_second_name_against_bot() {
        let names = PlayerNames::resolve(GameMode::HumanVsAi, Player::X, "Bob", "Alice");
        assert_eq!(names, PlayerNames::new("Bob", "Bot"));
    }

    #[test]
    fn test_ai_side_is_opposite_human() {
        let config = SessionConfig::new(GameMode::HumanVsAi, Player::O, PlayerNames::default());
        assert_eq!(config.ai_side(), Some(Player::X));

        let config = SessionConfig::new(GameMode::HumanVsHuman, Player::O, PlayerNames::default());
        assert_eq!(config.ai_side(), None);
    }

    #[test]
    fn test_mode_serializes_short_names() {
        assert_eq!(
            serde_json::to_string(&GameMode::HumanVsAi).unwrap(),
            "\"pvai\""
        );
    }
}
