//! Chat model trait and request types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The output shape requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// The backend must return a single machine-readable JSON object.
    ///
    /// Backends that cannot enforce this return a transport error, which
    /// callers handle by falling back to [`ResponseFormat::Text`] with an
    /// explicit textual instruction.
    JsonObject,
}

/// A single chat completion request: one system message, one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The system prompt.
    pub system: String,
    /// The user prompt.
    pub user: String,
    /// Sampling temperature. `None` uses the backend default.
    pub temperature: Option<f32>,
    /// Maximum number of output tokens. `None` uses the backend default.
    pub max_tokens: Option<u32>,
    /// The output shape requested from the backend.
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// Create a request with the given system and user prompts.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: None,
            max_tokens: None,
            response_format: ResponseFormat::Text,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the requested output shape.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }
}

/// A chat completion backend.
///
/// Implementations wrap specific generation services behind a unified
/// async interface so that callers can be constructed against the trait
/// and tested with [`MockChatModel`](crate::mock::MockChatModel).
///
/// # Example
///
/// ```rust,ignore
/// use lectern_model::{ChatModel, ChatRequest};
///
/// let reply = model.complete(&ChatRequest::new("You are terse.", "2+2?")).await?;
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Execute a single chat completion and return the reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
