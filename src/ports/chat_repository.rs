//! Chat history repository port.

use async_trait::async_trait;

use crate::domain::chat::{ChatMessage, NewChatMessage};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Appends a message to the user's history and returns it with its id.
    async fn append(&self, message: NewChatMessage) -> Result<ChatMessage, DomainError>;

    /// All messages of a user, oldest first.
    async fn history(&self, user_id: &UserId) -> Result<Vec<ChatMessage>, DomainError>;
}
