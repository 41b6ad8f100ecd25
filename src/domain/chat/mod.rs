//! Chat module - conversation history records.

mod message;

pub use message::{tail, ChatMessage, ChatRole, NewChatMessage};
