//! HTTP adapter for chat: one POST answered with server-sent events.

mod handlers;

pub use handlers::{chat_routes, ChatHandlers, ChatRequest};
