//! Tests for loading the bot configuration.

use duotoe::{BotConfig, LlmProvider, default_model};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = BotConfig::load_or_default(dir.path().join("absent.toml")).expect("defaults");

    assert_eq!(config, BotConfig::default());
    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(config.model(), "gemini-2.5-flash");
    assert_eq!(config.thinking_delay(true), Duration::from_millis(1000));
    assert_eq!(config.thinking_delay(false), Duration::from_millis(600));
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "llm_provider = \"anthropic\"").expect("write");
    writeln!(file, "thinking_delay_ms = 250").expect("write");

    let config = BotConfig::from_file(file.path()).expect("valid config");

    assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
    assert_eq!(config.model(), default_model(LlmProvider::Anthropic));
    assert_eq!(config.thinking_delay(false), Duration::from_millis(250));
    assert_eq!(config.thinking_delay(true), Duration::from_millis(1000));
    assert_eq!(*config.llm_max_tokens(), 512);
}

#[test]
fn test_explicit_model_wins() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "llm_provider = \"openai\"\nllm_model = \"gpt-4.1-mini\"").expect("write");

    let config = BotConfig::from_file(file.path()).expect("valid config");
    assert_eq!(config.model(), "gpt-4.1-mini");
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "llm_provider = \"carrier-pigeon\"").expect("write");

    let err = BotConfig::from_file(file.path()).expect_err("unknown provider");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_overrides_apply() {
    let config = BotConfig::default()
        .with_llm_provider(LlmProvider::OpenAI)
        .with_llm_model("gpt-4o".to_string());

    assert_eq!(config.model(), "gpt-4o");
    assert_eq!(LlmProvider::OpenAI.api_key_var(), "OPENAI_API_KEY");
}
