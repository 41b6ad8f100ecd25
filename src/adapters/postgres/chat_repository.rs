//! PostgreSQL implementation of ChatRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, db_error};
use crate::domain::chat::{ChatMessage, ChatRole, NewChatMessage};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, Timestamp, UserId};
use crate::ports::ChatRepository;

#[derive(Clone)]
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn append(&self, message: NewChatMessage) -> Result<ChatMessage, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO chat_messages (user_id, role, name, content, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(message.user_id.as_str())
        .bind(message.role.as_str())
        .bind(&message.name)
        .bind(&message.content)
        .bind(message.timestamp.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to insert chat message"))?;

        Ok(message.into_message(MessageId::new(id)))
    }

    async fn history(&self, user_id: &UserId) -> Result<Vec<ChatMessage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, role, name, content, timestamp
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch chat history"))?;

        rows.iter()
            .map(|row| -> Result<ChatMessage, DomainError> {
                let role: String = column(row, "role")?;
                Ok(ChatMessage {
                    id: MessageId::new(column(row, "id")?),
                    user_id: user_id.clone(),
                    role: role.parse::<ChatRole>().map_err(|e| {
                        DomainError::new(ErrorCode::DatabaseError, format!("Invalid chat role: {e}"))
                    })?,
                    name: column(row, "name")?,
                    content: column(row, "content")?,
                    timestamp: Timestamp::from_datetime(column(row, "timestamp")?),
                })
            })
            .collect()
    }
}
