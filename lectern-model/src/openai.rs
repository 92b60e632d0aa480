//! OpenAI-compatible chat completion backend.
//!
//! Talks to any `/v1/chat/completions`-style endpoint using `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::chat::{ChatModel, ChatRequest, ResponseFormat};
use crate::error::{ModelError, Result};

/// The default OpenAI chat completions endpoint.
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`ChatModel`] backed by an OpenAI-compatible chat completions API.
///
/// # Configuration
///
/// - `model` – defaults to `gpt-4o-mini`.
/// - `base_url` – defaults to the OpenAI endpoint; point it at any
///   compatible server.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment
///   variable.
/// - `timeout` – per-request deadline; expiry surfaces as
///   [`ModelError::Timeout`].
///
/// # Example
///
/// ```rust,ignore
/// use lectern_model::openai::OpenAIChatModel;
///
/// let model = OpenAIChatModel::new("sk-...")?;
/// let reply = model.complete(&request).await?;
/// ```
#[derive(Debug)]
pub struct OpenAIChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIChatModel {
    /// Create a new backend with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new backend with an explicit per-request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::Config("API key must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: OPENAI_CHAT_URL.into(),
        })
    }

    /// Create a new backend using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ModelError::Config("OPENAI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gpt-4o`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the chat completions URL of an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn map_transport_err(&self, e: reqwest::Error) -> ModelError {
        if e.is_timeout() {
            error!(model = %self.model, "chat request timed out");
            ModelError::Timeout { model: self.model.clone() }
        } else {
            error!(model = %self.model, error = %e, "chat request failed");
            ModelError::Backend { model: self.model.clone(), message: format!("request failed: {e}") }
        }
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── ChatModel implementation ───────────────────────────────────────

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!(
            model = %self.model,
            system_len = request.system.len(),
            user_len = request.user.len(),
            format = ?request.response_format,
            "chat completion"
        );

        let response_format = match request.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(ResponseFormatSpec { kind: "json_object" }),
        };

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message { role: "system", content: &request.system },
                Message { role: "user", content: &request.user },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(model = %self.model, %status, "chat API error");
            return Err(ModelError::Backend {
                model: self.model.clone(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(|e| ModelError::Backend {
                model: self.model.clone(),
                message: format!("failed to parse response: {e}"),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ModelError::Backend {
                model: self.model.clone(),
                message: "API returned no completion".into(),
            })
    }
}
