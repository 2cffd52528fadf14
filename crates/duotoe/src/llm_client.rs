//! LLM API client abstraction for Gemini, OpenAI and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini.
    Gemini,
    /// OpenAI (GPT models).
    #[value(name = "openai")]
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(
        provider: LlmProvider,
        api_key: String,
        model: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// A JSON Schema the reply must conform to.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    /// Schema name (OpenAI requires one).
    pub name: String,
    /// JSON Schema with lowercase types.
    pub schema: serde_json::Value,
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a free-form completion from a system prompt and user message.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = ?self.config.provider(), model = %self.config.model()))]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Generating completion");
        match self.config.provider() {
            LlmProvider::Gemini => self.generate_gemini(system_prompt, user_message, None).await,
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message, None).await,
            LlmProvider::Anthropic => {
                self.generate_anthropic(system_prompt, user_message).await
            }
        }
    }

    /// Generates a completion constrained to `schema`.
    ///
    /// Gemini and OpenAI enforce the schema server-side. Anthropic has no
    /// such mode, so the schema is appended to the system prompt and the
    /// caller is expected to extract the JSON from the text.
    #[instrument(skip(self, system_prompt, user_message, schema), fields(provider = ?self.config.provider(), schema = %schema.name))]
    pub async fn generate_json(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &ResponseSchema,
    ) -> Result<String, LlmError> {
        debug!("Generating structured completion");
        match self.config.provider() {
            LlmProvider::Gemini => {
                self.generate_gemini(system_prompt, user_message, Some(schema))
                    .await
            }
            LlmProvider::OpenAI => {
                self.generate_openai(system_prompt, user_message, Some(schema))
                    .await
            }
            LlmProvider::Anthropic => {
                let system = format!(
                    "{}\n\nRespond with a single JSON object matching this schema:\n{}",
                    system_prompt, schema.schema
                );
                self.generate_anthropic(&system, user_message).await
            }
        }
    }

    /// Generates a completion using Google Gemini.
    #[instrument(skip(self, system_prompt, user_message, schema))]
    async fn generate_gemini(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: Option<&ResponseSchema>,
    ) -> Result<String, LlmError> {
        debug!("Building Gemini API request");
        let mut generation_config = serde_json::json!({
            "temperature": self.config.temperature(),
            "maxOutputTokens": self.config.max_tokens(),
        });
        if let Some(schema) = schema {
            generation_config["responseMimeType"] = "application/json".into();
            generation_config["responseSchema"] = gemini_schema(&schema.schema);
        }

        let request_body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": user_message }]
                }
            ],
            "generationConfig": generation_config,
        });

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.config.model()
        );

        debug!("Sending request to Gemini");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.config.api_key().to_string())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Gemini API request failed");
                LlmError::new(format!("Gemini API request failed: {}", e))
            })?;

        let response_json = read_json_response("Gemini", response).await?;

        let content = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Gemini response");
                LlmError::new("No text content in Gemini response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model(),
            "max_tokens": self.config.max_tokens(),
            "temperature": self.config.temperature(),
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        debug!("Sending request to Anthropic");
        let response = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.config.api_key().to_string())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let response_json = read_json_response("Anthropic", response).await?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using OpenAI.
    #[instrument(skip(self, system_prompt, user_message, schema))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: Option<&ResponseSchema>,
    ) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key().to_string()),
        );

        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build system message");
                        LlmError::new(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        LlmError::new(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.config.model())
            .messages(messages)
            .max_completion_tokens(self.config.max_tokens())
            .temperature(self.config.temperature());
        if let Some(schema) = schema {
            args.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: schema.name.clone(),
                    schema: Some(schema.schema.clone()),
                    strict: Some(false),
                },
            });
        }
        let request = args.build().map_err(|e| {
            error!(error = ?e, "Failed to build request");
            LlmError::new(format!("Failed to build request: {}", e))
        })?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                LlmError::new("No content in OpenAI response".to_string())
            })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// Reads a response body, failing on non-success status or invalid JSON.
async fn read_json_response(
    provider: &str,
    response: reqwest::Response,
) -> Result<serde_json::Value, LlmError> {
    let status = response.status();
    let response_text = response.text().await.map_err(|e| {
        error!(provider, error = ?e, "Failed to read response");
        LlmError::new(format!("Failed to read {} response: {}", provider, e))
    })?;

    if !status.is_success() {
        error!(provider, status = %status, response = %response_text, "API error");
        return Err(LlmError::new(format!(
            "{} API error {}: {}",
            provider, status, response_text
        )));
    }

    debug!(provider, response_length = response_text.len(), "Parsing response");
    serde_json::from_str(&response_text).map_err(|e| {
        error!(provider, error = ?e, response = %response_text, "Failed to parse response");
        LlmError::new(format!("Failed to parse {} response: {}", provider, e))
    })
}

/// Converts a JSON Schema to Gemini's OpenAPI subset.
///
/// Gemini expects upper-case type names and rejects `additionalProperties`.
pub fn gemini_schema(schema: &serde_json::Value) -> serde_json::Value {
    match schema {
        serde_json::Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "additionalProperties" | "$schema" | "title" => {}
                    "type" => {
                        let upper = value
                            .as_str()
                            .map(|t| serde_json::Value::String(t.to_uppercase()))
                            .unwrap_or_else(|| value.clone());
                        out.insert(key.clone(), upper);
                    }
                    "properties" => {
                        let props = value
                            .as_object()
                            .map(|props| {
                                props
                                    .iter()
                                    .map(|(name, prop)| (name.clone(), gemini_schema(prop)))
                                    .collect::<serde_json::Map<_, _>>()
                            })
                            .map(serde_json::Value::Object)
                            .unwrap_or_else(|| value.clone());
                        out.insert(key.clone(), props);
                    }
                    _ => {
                        out.insert(key.clone(), gemini_schema(value));
                    }
                }
            }
            serde_json::Value::Object(out)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(gemini_schema).collect())
        }
        other => other.clone(),
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
