//! Events emitted while answering a chat message.

use std::pin::Pin;

use futures::Stream;
use serde::Serialize;

/// Info event sent when no persona was selected.
pub const NO_AI_SCHEDULED_EVENT: &str = "no_ai_scheduled";

/// One server-sent event of a chat reply.
///
/// The payload serializes without a tag; [`ChatEvent::name`] carries the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatEvent {
    /// A fragment of the persona's reply.
    Content { content: String },
    /// A failure or user guidance, attributed to whoever raised it.
    Error { error: String, ai_name: String },
    /// A non-error notice.
    Info { event: String, message: String },
    /// The persona finished its reply.
    Done { ai_name: String },
}

impl ChatEvent {
    pub fn content(content: impl Into<String>) -> Self {
        ChatEvent::Content {
            content: content.into(),
        }
    }

    pub fn error(error: impl Into<String>, ai_name: impl Into<String>) -> Self {
        ChatEvent::Error {
            error: error.into(),
            ai_name: ai_name.into(),
        }
    }

    pub fn info(event: impl Into<String>, message: impl Into<String>) -> Self {
        ChatEvent::Info {
            event: event.into(),
            message: message.into(),
        }
    }

    pub fn done(ai_name: impl Into<String>) -> Self {
        ChatEvent::Done {
            ai_name: ai_name.into(),
        }
    }

    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Content { .. } => "content",
            ChatEvent::Error { .. } => "error",
            ChatEvent::Info { .. } => "info",
            ChatEvent::Done { .. } => "done",
        }
    }
}

/// Events of one reply, in emission order.
pub type ChatEventStream = Pin<Box<dyn Stream<Item = ChatEvent> + Send>>;
