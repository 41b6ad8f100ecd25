//! Prompt assembly for persona replies.

use crate::domain::assessment::{AssessmentStatus, QuestionDefinition};
use crate::domain::chat::{tail, ChatMessage};
use crate::domain::persona::Persona;
use crate::ports::{CompletionRequest, Message, MessageRole, RequestMetadata};

const NAME_PLACEHOLDER: &str = "#name#";
const GROUP_NAME_PLACEHOLDER: &str = "#groupName#";

const COMPLETED_HEADER: &str = "\n\n[System instruction: assessment completed]\nFollowing your persona, tell the user the assessment is complete and explain the next steps.";
const CANCELLED_HEADER: &str = "\n\n[System instruction: assessment stopped]\nFollowing your persona, politely tell the user the assessment has been stopped.";

/// System prompt for `persona`: its own prompt, else the shared one.
///
/// Returns `None` when neither is configured.
pub fn system_prompt(persona: &Persona, group_name: &str, shared_prompt: &str) -> Option<String> {
    let template = if !persona.custom_prompt.is_empty() {
        persona.custom_prompt.as_str()
    } else if !shared_prompt.is_empty() {
        shared_prompt
    } else {
        return None;
    };
    Some(
        template
            .replace(NAME_PLACEHOLDER, &persona.name)
            .replace(GROUP_NAME_PLACEHOLDER, group_name),
    )
}

/// Tells the assessment persona what to ask, or that the assessment ended.
pub fn assessment_context(
    question: Option<&QuestionDefinition>,
    status: AssessmentStatus,
) -> Option<String> {
    if let Some(question) = question {
        let mut header = format!(
            "\n\n[System instruction: current assessment question]\nQuestion text: {}",
            question.text
        );
        if !question.options.is_empty() {
            header.push_str("\nOptions (choose one or more):\n");
            for (letter, option) in ('A'..='Z').zip(&question.options) {
                header.push_str(&format!("{letter}. {option}\n"));
            }
        }
        return Some(header);
    }
    match status {
        AssessmentStatus::Completed => Some(COMPLETED_HEADER.to_string()),
        AssessmentStatus::Cancelled => Some(CANCELLED_HEADER.to_string()),
        AssessmentStatus::InProgress => None,
    }
}

/// Everything that goes into one persona reply.
pub struct PromptParts<'a> {
    pub persona: &'a Persona,
    pub system_prompt: Option<String>,
    pub context_header: Option<String>,
    /// Prior conversation, oldest first, without the current message.
    pub history: &'a [ChatMessage],
    pub history_limit: usize,
    pub message: &'a str,
}

/// Builds the completion request: system prompt, context header, recent
/// history, then the user's message.
pub fn build_request(parts: PromptParts<'_>, metadata: RequestMetadata) -> CompletionRequest {
    let mut request = CompletionRequest::new(metadata).with_model(&parts.persona.model);

    if let Some(prompt) = parts.system_prompt {
        request = request.with_system_prompt(prompt);
    }
    if let Some(header) = parts.context_header {
        request = request.push(Message::assistant(header));
    }
    for past in tail(parts.history, parts.history_limit) {
        let message = if past.role.is_assistant() {
            Message::new(MessageRole::Assistant, &past.content).named(&past.name)
        } else {
            Message::new(MessageRole::User, &past.content)
        };
        request = request.push(message);
    }
    request.push(Message::user(parts.message))
}
