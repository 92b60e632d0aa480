//! Structured generation adapter.
//!
//! Drives a [`ChatModel`] toward a machine-readable reply: first with the
//! backend's strict JSON mode, then once more with an explicit textual
//! instruction, then through the extraction pipeline. Content-shape
//! problems never escape as errors — the adapter always hands its caller
//! a value, success or a [`StructuredReply::Malformed`] diagnostic.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use lectern_model::{ChatModel, ChatRequest, ResponseFormat};

use crate::error::Result;
use crate::extract::{
    ParseOutcome, RAW_RESPONSE_PREVIEW, extract_json, preview, truncate_system_prompt,
    truncate_user_prompt,
};

/// Instruction appended to both prompts on the fallback attempt.
const JSON_ONLY_INSTRUCTION: &str =
    "Respond with a single valid JSON object and nothing else: no prose, no code fences.";

/// The terminal value of one structured generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredReply {
    /// A JSON value was recovered from the reply.
    Object(Value),
    /// The backend replied but no JSON could be extracted.
    Malformed {
        /// What went wrong.
        message: String,
        /// Truncated raw reply text for diagnostics.
        raw_response: String,
    },
}

/// Adapter that coerces free-form model output into JSON.
pub struct StructuredGenerator {
    model: Arc<dyn ChatModel>,
}

impl StructuredGenerator {
    /// Create an adapter over the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Request a JSON object for the given prompts.
    ///
    /// Oversized prompts are truncated before transmission (the user
    /// prompt keeps its head and tail so trailing format instructions
    /// survive).
    ///
    /// # Errors
    ///
    /// Only transport failures are errors, and only after the fallback
    /// attempt also failed. An unparsable reply is a normal return value.
    pub async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<StructuredReply> {
        let system = truncate_system_prompt(system_prompt);
        let user = truncate_user_prompt(user_prompt);

        let strict = ChatRequest::new(system.as_str(), user.as_str())
            .with_response_format(ResponseFormat::JsonObject);

        let raw = match self.model.complete(&strict).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    model = self.model.name(),
                    error = %e,
                    "strict JSON mode failed, retrying with textual instruction"
                );
                let fallback = ChatRequest::new(
                    format!("{system}\n\n{JSON_ONLY_INSTRUCTION}"),
                    format!("{user}\n\n{JSON_ONLY_INSTRUCTION}"),
                );
                self.model.complete(&fallback).await?
            }
        };

        match extract_json(&raw) {
            ParseOutcome::Parsed(value) => {
                info!(model = self.model.name(), "structured reply parsed");
                Ok(StructuredReply::Object(value))
            }
            ParseOutcome::Unparsed(text) => {
                error!(
                    model = self.model.name(),
                    preview = %preview(&text, RAW_RESPONSE_PREVIEW),
                    "generation reply contained no JSON"
                );
                Ok(StructuredReply::Malformed {
                    message: "response did not contain a JSON object".into(),
                    raw_response: preview(&text, RAW_RESPONSE_PREVIEW),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_model::{MockChatModel, ScriptedReply};

    #[tokio::test]
    async fn strict_mode_success_parses_directly() {
        let model = Arc::new(MockChatModel::new(vec![ScriptedReply::Text(
            r#"{"questions": []}"#.into(),
        )]));
        let generator = StructuredGenerator::new(Arc::clone(&model) as Arc<dyn ChatModel>);

        let reply = generator.generate("system", "user").await.unwrap();
        assert!(matches!(reply, StructuredReply::Object(_)));

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].response_format, ResponseFormat::JsonObject);
    }

    #[tokio::test]
    async fn strict_failure_falls_back_with_json_instruction() {
        let model = Arc::new(MockChatModel::new(vec![
            ScriptedReply::BackendError("json mode unsupported".into()),
            ScriptedReply::Text(r#"{"ok": true}"#.into()),
        ]));
        let generator = StructuredGenerator::new(Arc::clone(&model) as Arc<dyn ChatModel>);

        let reply = generator.generate("system", "user").await.unwrap();
        assert_eq!(reply, StructuredReply::Object(serde_json::json!({"ok": true})));

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].response_format, ResponseFormat::Text);
        assert!(requests[1].system.contains(JSON_ONLY_INSTRUCTION));
        assert!(requests[1].user.contains(JSON_ONLY_INSTRUCTION));
    }

    #[tokio::test]
    async fn second_transport_failure_is_fatal() {
        let model = Arc::new(MockChatModel::new(vec![
            ScriptedReply::Timeout,
            ScriptedReply::Timeout,
        ]));
        let generator = StructuredGenerator::new(model as Arc<dyn ChatModel>);

        assert!(generator.generate("system", "user").await.is_err());
    }

    #[tokio::test]
    async fn unparsable_reply_is_a_value_not_an_error() {
        let model = Arc::new(MockChatModel::new(vec![ScriptedReply::Text("not json".into())]));
        let generator = StructuredGenerator::new(model as Arc<dyn ChatModel>);

        let reply = generator.generate("system", "user").await.unwrap();
        match reply {
            StructuredReply::Malformed { raw_response, .. } => {
                assert!(raw_response.contains("not json"));
            }
            other => panic!("expected malformed reply, got {other:?}"),
        }
    }
}
