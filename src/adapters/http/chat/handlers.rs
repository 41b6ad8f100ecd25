//! POST /api/chat - streams persona replies as server-sent events.
//!
//! Quota failures are plain JSON errors. Once the stream is open every
//! outcome, failures included, arrives as an event:
//!
//! | event     | payload                              |
//! |-----------|--------------------------------------|
//! | `content` | `{"content": "..."}`                 |
//! | `error`   | `{"error": "...", "ai_name": "..."}` |
//! | `info`    | `{"event": "...", "message": "..."}` |
//! | `done`    | `{"ai_name": "..."}`                 |

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::post,
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};

use crate::adapters::http::error::ApiError;
use crate::application::handlers::{ChatEvent, SendChatMessageCommand, SendChatMessageHandler};
use crate::domain::foundation::UserId;

#[derive(Clone)]
pub struct ChatHandlers {
    send_handler: Arc<SendChatMessageHandler>,
}

impl ChatHandlers {
    pub fn new(send_handler: Arc<SendChatMessageHandler>) -> Self {
        Self { send_handler }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub group_id: Option<String>,
}

fn to_sse(event: ChatEvent) -> Event {
    let data = serde_json::to_string(&event).unwrap_or_else(|err| {
        warn!(error = %err, "failed to encode chat event");
        "{}".to_string()
    });
    Event::default().event(event.name()).data(data)
}

pub async fn send_message(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }
    let cmd = SendChatMessageCommand {
        user_id: UserId::new(req.user_id)?,
        message: req.message,
        group_id: req.group_id.filter(|g| !g.trim().is_empty()),
    };
    info!(user_id = %cmd.user_id, group_id = ?cmd.group_id, "chat message received");

    let events = handlers.send_handler.handle(cmd).await?;
    let stream = events.map(|event| Ok::<_, Infallible>(to_sse(event)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/", post(send_message))
        .with_state(handlers)
}
