//! Mock chat model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatModel, ChatRequest};
use crate::error::{ModelError, Result};

/// A scripted reply returned by [`MockChatModel::complete`].
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text.
    Text(String),
    /// Fail with [`ModelError::Backend`] carrying this message.
    BackendError(String),
    /// Fail with [`ModelError::Timeout`].
    Timeout,
}

/// A [`ChatModel`] that replays scripted replies, for dependency-injected
/// tests.
///
/// Replies are consumed in order; once the script is exhausted every call
/// fails with a backend error. All received requests are recorded and can
/// be inspected with [`requests`](MockChatModel::requests).
///
/// # Example
///
/// ```rust,ignore
/// use lectern_model::mock::{MockChatModel, ScriptedReply};
///
/// let model = MockChatModel::new(vec![ScriptedReply::Text("{}".into())]);
/// let reply = model.complete(&request).await?;
/// assert_eq!(model.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockChatModel {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    /// Create a mock that replays the given replies in order.
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self { replies: Mutex::new(replies.into()), requests: Mutex::new(Vec::new()) }
    }

    /// Create a mock that always returns the same text.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            replies: Mutex::new(
                std::iter::repeat_with(|| ScriptedReply::Text(text.clone())).take(64).collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().expect("mock lock poisoned").push(request.clone());

        let next = self.replies.lock().expect("mock lock poisoned").pop_front();
        match next {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::BackendError(message)) => {
                Err(ModelError::Backend { model: "mock".into(), message })
            }
            Some(ScriptedReply::Timeout) => Err(ModelError::Timeout { model: "mock".into() }),
            None => Err(ModelError::Backend {
                model: "mock".into(),
                message: "mock script exhausted".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order() {
        let model = MockChatModel::new(vec![
            ScriptedReply::Text("first".into()),
            ScriptedReply::Timeout,
        ]);
        let request = ChatRequest::new("s", "u");

        assert_eq!(model.complete(&request).await.unwrap(), "first");
        assert!(matches!(model.complete(&request).await, Err(ModelError::Timeout { .. })));
        assert!(model.complete(&request).await.is_err());
        assert_eq!(model.requests().len(), 3);
    }
}
