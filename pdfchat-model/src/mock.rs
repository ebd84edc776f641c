//! Scripted chat model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::message::{ChatMessage, Role};
use crate::model::ChatModel;

/// A [`ChatModel`] that replays scripted outcomes and records every request.
///
/// Once the script is exhausted it answers with `echo: <last user message>`.
///
/// ```rust,ignore
/// let model = MockChatModel::new("mock")
///     .with_reply("Node.js is a JavaScript runtime.")
///     .with_failure("rate limited");
/// ```
pub struct MockChatModel {
    name: String,
    script: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), script: Mutex::new(VecDeque::new()), requests: Mutex::new(Vec::new()) }
    }

    /// Queue a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queue a provider failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(ModelError::Provider { provider: self.name.clone(), message: message.into() }));
        self
    }

    /// Message lists received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of completed calls, successful or not.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn push(&self, outcome: Result<String>) {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(outcome);
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(messages.to_vec());

        let scripted = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                Ok(format!("echo: {last_user}"))
            }
        }
    }
}
