//! Bot configuration: LLM provider settings and move pacing.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the bot opponent.
///
/// Every field is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", strip_option)]
#[serde(default)]
pub struct BotConfig {
    /// LLM provider (gemini, openai or anthropic).
    llm_provider: LlmProvider,

    /// Model name; the provider's default when unset.
    llm_model: Option<String>,

    /// Maximum tokens for LLM responses.
    llm_max_tokens: u32,

    /// Sampling temperature. Low values keep play consistent.
    llm_temperature: f32,

    /// Minimum thinking time before the bot's opening move.
    opening_delay_ms: u64,

    /// Minimum thinking time before every other bot move.
    thinking_delay_ms: u64,

    /// Upper bound on one provider call.
    request_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::Gemini,
            llm_model: None,
            llm_max_tokens: 512,
            llm_temperature: 0.1,
            opening_delay_ms: 1000,
            thinking_delay_ms: 600,
            request_timeout_secs: 20,
        }
    }
}

/// Default model for each provider.
#[instrument]
pub fn default_model(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Gemini => "gemini-2.5-flash",
        LlmProvider::OpenAI => "gpt-4o-mini",
        LlmProvider::Anthropic => "claude-3-5-haiku-20241022",
    }
}

impl BotConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(provider = ?config.llm_provider, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// The model to request, falling back to the provider default.
    pub fn model(&self) -> &str {
        self.llm_model
            .as_deref()
            .unwrap_or_else(|| default_model(self.llm_provider))
    }

    /// Minimum thinking time for a bot move.
    ///
    /// The opening move (empty board) gets the longer delay.
    pub fn thinking_delay(&self, opening: bool) -> Duration {
        if opening {
            Duration::from_millis(self.opening_delay_ms)
        } else {
            Duration::from_millis(self.thinking_delay_ms)
        }
    }

    /// Upper bound on one provider call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Creates LLM configuration from this bot config.
    ///
    /// Reads the provider's API key from the environment
    /// (`GEMINI_API_KEY`, `OPENAI_API_KEY` or `ANTHROPIC_API_KEY`).
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.model()))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.model().to_string(),
            self.llm_max_tokens,
            self.llm_temperature,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
