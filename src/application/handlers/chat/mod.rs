//! Chat orchestration: quota, scheduling, assessment and the streamed reply.

mod errors;
mod events;
mod prompt;
mod send_message;

pub use errors::ChatError;
pub use events::{ChatEvent, ChatEventStream, NO_AI_SCHEDULED_EVENT};
pub use prompt::{assessment_context, build_request, system_prompt, PromptParts};
pub use send_message::{
    AssessmentFlow, ChatSettings, SendChatMessageCommand, SendChatMessageHandler,
    DEFAULT_GUEST_QUOTA, DEFAULT_HISTORY_LIMIT, NO_AI_SCHEDULED_MESSAGE,
};
