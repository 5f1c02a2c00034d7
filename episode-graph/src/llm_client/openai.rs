//! OpenAI-compatible LLM client implementation.
//!
//! Request URL and auth headers come from `async-openai`'s [`OpenAIConfig`];
//! the call itself goes through `reqwest` so that the HTTP status and raw
//! error body are always available for classification. Gemini's
//! OpenAI-compatible endpoint answers errors with Google-shaped bodies
//! (integer `code`, sometimes wrapped in a list) that the OpenAI error type
//! cannot decode. Transient failures are retried with `backoff`.

use std::time::Duration;

use async_openai::config::{Config, OpenAIConfig};
use backoff::ExponentialBackoffBuilder;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{EpisodeGraphError, LlmError, Result};
use crate::types::EpisodeGraphConfig;
use crate::utils::truncate_with_ellipsis;

use super::{LanguageModel, Message};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

// ── Retry configuration ───────────────────────────────────────────────────────

/// Exponential backoff bounds for transient failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    /// Total time budget across all attempts.
    pub max_elapsed_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            max_elapsed_time: Duration::from_secs(300),
        }
    }
}

// ── Client struct ─────────────────────────────────────────────────────────────

/// Chat-completions client implementing [`LanguageModel`].
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAIConfig,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryConfig,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_key`  – Secret key for the endpoint.
    /// * `api_base` – Base URL of the OpenAI-compatible API.
    /// * `model`    – Model name (e.g. `"gemini-2.0-flash"`).
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            http: reqwest::Client::new(),
            config,
            model: model.into(),
            temperature: 0.0,
            max_tokens: 8_192,
            retry: RetryConfig::default(),
        }
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &EpisodeGraphConfig) -> Self {
        Self::new(&config.api_key, &config.api_base, &config.model_name)
    }

    /// Override the sampling temperature (default `0.0`).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the max output token limit (default `8192`).
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a conversation and return the assistant's reply text.
    pub async fn generate(&self, messages: &[Message]) -> Result<String> {
        let request = json!({
            "model": self.model,
            "messages": serde_json::to_value(messages)?,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self.call_with_retry(&request).await?;
        Self::extract_content(&response)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Call the chat completions endpoint with exponential-backoff retry.
    async fn call_with_retry(&self, request: &Value) -> Result<Value> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry.initial_interval)
            .with_max_interval(self.retry.max_interval)
            .with_max_elapsed_time(Some(self.retry.max_elapsed_time))
            .build();

        let this = self;
        backoff::future::retry(policy, move || async move {
            this.post_chat(request).await.map_err(|llm_err| {
                if llm_err.is_transient() {
                    warn!(error = %llm_err, "LLM call failed, retrying with backoff");
                    backoff::Error::transient(llm_err)
                } else {
                    backoff::Error::permanent(llm_err)
                }
            })
        })
        .await
        .map_err(EpisodeGraphError::Llm)
    }

    /// One chat-completions round trip.
    async fn post_chat(&self, request: &Value) -> std::result::Result<Value, LlmError> {
        let response = self
            .http
            .post(self.config.url(CHAT_COMPLETIONS_PATH))
            .query(&self.config.query())
            .headers(self.config.headers())
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;

        if !(200..300).contains(&status) {
            return Err(classify_error_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| LlmError::Api {
            status,
            message: format!("undecodable response body: {e}"),
        })
    }

    /// Extract the assistant message text from a chat-completions response.
    fn extract_content(response: &Value) -> Result<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or(EpisodeGraphError::Llm(LlmError::EmptyResponse))
    }
}

// ── LanguageModel implementation ──────────────────────────────────────────────

impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");
        self.generate(&[Message::user(prompt)]).await
    }
}

// ── Error mapping ─────────────────────────────────────────────────────────────

fn map_transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        LlmError::Transport(err.to_string())
    } else {
        LlmError::Api {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            message: err.to_string(),
        }
    }
}

/// The `error` object of a failed response, in either OpenAI's shape
/// (`{"error": {...}}` with string `code` and `type`) or Google's
/// (integer `code`, string `status`, optionally wrapped in a one-element list).
#[derive(Debug, Default, PartialEq)]
struct ErrorBody {
    code: String,
    kind: String,
    message: String,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let error = match &value {
            Value::Array(items) => items.first().map(|item| &item["error"]),
            other => Some(&other["error"]),
        }
        .filter(|e| e.is_object());

        let Some(error) = error else {
            return Self {
                message: truncate_with_ellipsis(body.trim(), 500),
                ..Self::default()
            };
        };

        let field = |name: &str| match &error[name] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let kind = match field("type") {
            t if t.is_empty() => field("status"),
            t => t,
        };

        Self {
            code: field("code"),
            kind,
            message: field("message"),
        }
    }
}

/// Classify a non-2xx response by its status first, then its body.
fn classify_error_response(status: u16, body: &str) -> LlmError {
    let parsed = ErrorBody::parse(body);
    match status {
        429 => LlmError::RateLimit,
        401 | 403 => LlmError::Authentication,
        s if s >= 500 => LlmError::Api {
            status: s,
            message: parsed.message,
        },
        s => match classify_api_error(&parsed.code, &parsed.kind, parsed.message) {
            LlmError::Api { message, .. } => LlmError::Api { status: s, message },
            other => other,
        },
    }
}

/// Classify an API error body by its `code`, `type` (or Google `status`) and message.
fn classify_api_error(code: &str, kind: &str, message: String) -> LlmError {
    let code = code.to_lowercase();
    let kind = kind.to_lowercase();
    let lowered = message.to_lowercase();
    if code.contains("invalid_api_key")
        || kind.contains("authentication")
        || kind == "unauthenticated"
        || kind == "permission_denied"
        || lowered.contains("api key not valid")
    {
        LlmError::Authentication
    } else if code.contains("rate_limit") || kind.contains("rate_limit") || kind == "resource_exhausted" {
        LlmError::RateLimit
    } else if kind.contains("server_error") {
        LlmError::Api { status: 500, message }
    } else {
        LlmError::Api { status: 0, message }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
