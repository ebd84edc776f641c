//! Conversation history and the retrieve-then-answer turn.

use std::sync::Arc;

use pdfchat_model::{ChatMessage, ChatModel};
use pdfchat_rag::Retriever;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::prompt::build_user_prompt;

/// Ordered, append-only chat history.
///
/// Starts with a single system message and grows by one user and one
/// assistant message per successful turn. Nothing is ever removed; when
/// `max_history_turns` is set only the most recent exchanges are sent to the
/// model, the stored history stays complete.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    max_history_turns: Option<usize>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self { messages: vec![ChatMessage::system(system_prompt)], max_history_turns: None }
    }

    /// Limit how many past exchanges accompany each request. `None` sends all.
    pub fn with_max_history_turns(mut self, turns: Option<usize>) -> Self {
        self.max_history_turns = turns;
        self
    }

    /// Every stored message, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of completed exchanges.
    pub fn turns(&self) -> usize {
        (self.messages.len() - 1) / 2
    }

    /// The message list to send for `user`: system prompt, the windowed
    /// history, then `user` itself.
    pub fn request_for(&self, user: &ChatMessage) -> Vec<ChatMessage> {
        let history = &self.messages[1..];
        let keep = match self.max_history_turns {
            Some(turns) => history.len().min(turns.saturating_mul(2)),
            None => history.len(),
        };

        let mut request = Vec::with_capacity(keep + 2);
        request.push(self.messages[0].clone());
        request.extend_from_slice(&history[history.len() - keep..]);
        request.push(user.clone());
        request
    }

    /// Record a completed exchange.
    pub fn commit(&mut self, user: ChatMessage, assistant: ChatMessage) {
        self.messages.push(user);
        self.messages.push(assistant);
    }
}

/// Answers queries against one collection with one chat model.
#[derive(Clone)]
pub struct ChatSession {
    retriever: Retriever,
    model: Arc<dyn ChatModel>,
}

impl ChatSession {
    pub fn new(retriever: Retriever, model: Arc<dyn ChatModel>) -> Self {
        Self { retriever, model }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Run one turn: retrieve context, ask the model, record the exchange.
    ///
    /// The exchange is committed only after the model has answered, so a
    /// failed turn leaves `conversation` exactly as it was.
    #[instrument(skip_all, fields(turn = conversation.turns() + 1))]
    pub async fn answer(&self, conversation: &mut Conversation, query: &str) -> Result<String> {
        let results = self.retriever.retrieve(query).await?;
        debug!(
            retrieved = results.len(),
            pages = ?results.iter().map(|r| r.chunk.page_number()).collect::<Vec<_>>(),
            "retrieved context"
        );

        let user = ChatMessage::user(build_user_prompt(query, &results));
        let request = conversation.request_for(&user);
        let reply = self.model.complete(&request).await?;
        info!(model = self.model.name(), reply_chars = reply.chars().count(), "model answered");

        conversation.commit(user, ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use pdfchat_model::Role;

    use super::*;

    fn conversation_with_turns(n: usize) -> Conversation {
        let mut conversation = Conversation::new("sys");
        for i in 0..n {
            conversation
                .commit(ChatMessage::user(format!("q{i}")), ChatMessage::assistant(format!("a{i}")));
        }
        conversation
    }

    #[test]
    fn starts_with_only_the_system_message() {
        let conversation = Conversation::new("sys");
        assert_eq!(conversation.messages(), &[ChatMessage::system("sys")]);
        assert_eq!(conversation.turns(), 0);
    }

    #[test]
    fn commit_appends_in_order() {
        let conversation = conversation_with_turns(2);
        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(conversation.turns(), 2);
    }

    #[test]
    fn unlimited_request_carries_full_history() {
        let conversation = conversation_with_turns(3);
        let request = conversation.request_for(&ChatMessage::user("next"));
        assert_eq!(request.len(), 8);
        assert_eq!(request[0].role, Role::System);
        assert_eq!(request[7].content, "next");
    }

    #[test]
    fn window_limits_request_but_not_storage() {
        let conversation = conversation_with_turns(3).with_max_history_turns(Some(1));
        let request = conversation.request_for(&ChatMessage::user("next"));

        let contents: Vec<&str> = request.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "q2", "a2", "next"]);
        assert_eq!(conversation.messages().len(), 7);
    }

    #[test]
    fn huge_window_sends_everything() {
        let conversation = conversation_with_turns(2).with_max_history_turns(Some(usize::MAX));
        let request = conversation.request_for(&ChatMessage::user("next"));
        assert_eq!(request.len(), 6);
        assert_eq!(request[1].content, "q0");
    }

    #[test]
    fn zero_turn_window_sends_system_and_query_only() {
        let conversation = conversation_with_turns(2).with_max_history_turns(Some(0));
        assert_eq!(conversation.request_for(&ChatMessage::user("next")).len(), 2);
    }
}
