//! In-memory chat history.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::{ChatMessage, NewChatMessage};
use crate::domain::foundation::{DomainError, MessageId, UserId};
use crate::ports::ChatRepository;

#[derive(Debug, Default)]
struct History {
    by_user: HashMap<UserId, Vec<ChatMessage>>,
    last_id: i64,
}

/// In-memory `ChatRepository`; message ids are global and sequential.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    history: Arc<RwLock<History>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn append(&self, message: NewChatMessage) -> Result<ChatMessage, DomainError> {
        let mut history = self.history.write().await;
        history.last_id += 1;
        let stored = message.into_message(MessageId::new(history.last_id));
        history
            .by_user
            .entry(stored.user_id.clone())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn history(&self, user_id: &UserId) -> Result<Vec<ChatMessage>, DomainError> {
        Ok(self
            .history
            .read()
            .await
            .by_user
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
