//! Chat message records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{MessageId, Timestamp, UserId, ValidationError};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, ChatRole::Assistant)
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = ValidationError;

    /// Accepts `ai` as a legacy spelling of `assistant`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(ChatRole::User),
            "assistant" | "ai" => Ok(ChatRole::Assistant),
            "system" => Ok(ChatRole::System),
            other => Err(ValidationError::unsupported_value("role", other)),
        }
    }
}

/// A persisted message in a user's conversation.
///
/// `name` is the user id for user messages and the persona's display
/// name for assistant replies; the scorer uses it as a recency signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub role: ChatRole,
    pub name: String,
    pub content: String,
    pub timestamp: Timestamp,
}

/// A message that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub user_id: UserId,
    pub role: ChatRole,
    pub name: String,
    pub content: String,
    pub timestamp: Timestamp,
}

impl NewChatMessage {
    /// A message typed by the user, attributed to their own id.
    pub fn from_user(user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            name: user_id.as_str().to_string(),
            user_id,
            role: ChatRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// A reply spoken by a persona.
    pub fn from_persona(
        user_id: UserId,
        persona_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            role: ChatRole::Assistant,
            name: persona_name.into(),
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Attaches the store-assigned id.
    pub fn into_message(self, id: MessageId) -> ChatMessage {
        ChatMessage {
            id,
            user_id: self.user_id,
            role: self.role,
            name: self.name,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

/// Returns the last `limit` entries of `history`.
pub fn tail(history: &[ChatMessage], limit: usize) -> &[ChatMessage] {
    &history[history.len().saturating_sub(limit)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    #[test]
    fn role_parses_legacy_ai_spelling() {
        assert_eq!("ai".parse::<ChatRole>().unwrap(), ChatRole::Assistant);
        assert_eq!("Assistant".parse::<ChatRole>().unwrap(), ChatRole::Assistant);
        assert!("bot".parse::<ChatRole>().is_err());
    }

    #[test]
    fn user_message_is_named_after_user() {
        let msg = NewChatMessage::from_user(user(), "hello");
        assert_eq!(msg.name, "u1");
        assert_eq!(msg.role, ChatRole::User);
    }

    #[test]
    fn persona_reply_keeps_persona_name() {
        let msg = NewChatMessage::from_persona(user(), "Coach", "hi").into_message(MessageId::new(4));
        assert_eq!(msg.id, MessageId::new(4));
        assert_eq!(msg.name, "Coach");
        assert!(msg.role.is_assistant());
    }

    #[test]
    fn tail_returns_at_most_limit_newest_entries() {
        let msgs: Vec<ChatMessage> = (1..=5)
            .map(|i| {
                NewChatMessage::from_user(user(), format!("m{}", i)).into_message(MessageId::new(i))
            })
            .collect();

        let last = tail(&msgs, 3);
        assert_eq!(last.len(), 3);
        assert_eq!(last[0].content, "m3");
        assert_eq!(tail(&msgs, 10).len(), 5);
        assert!(tail(&[], 3).is_empty());
    }
}
