//! # lectern-model
//!
//! Chat completion model abstraction for lectern.
//!
//! This crate defines the [`ChatModel`] seam that the retrieval and quiz
//! layers are built against, plus two implementations:
//!
//! - [`OpenAIChatModel`] — any OpenAI-compatible `/v1/chat/completions`
//!   endpoint, with optional strict JSON-object output mode
//! - [`MockChatModel`] — scripted replies and failure injection for tests
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use lectern_model::{ChatRequest, ChatModel, OpenAIChatModel, ResponseFormat};
//!
//! let model = OpenAIChatModel::from_env()?;
//! let request = ChatRequest::new("You are a helpful assistant.", "Say hi.")
//!     .with_temperature(0.3)
//!     .with_response_format(ResponseFormat::Text);
//! let reply = model.complete(&request).await?;
//! ```

pub mod chat;
pub mod error;
pub mod mock;
pub mod openai;

pub use chat::{ChatModel, ChatRequest, ResponseFormat};
pub use error::{ModelError, Result};
pub use mock::{MockChatModel, ScriptedReply};
pub use openai::OpenAIChatModel;
