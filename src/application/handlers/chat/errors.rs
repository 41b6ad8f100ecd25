//! Chat orchestration errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ErrorKind, PersonaId};
use crate::domain::persona::SchedulingError;
use crate::ports::AIError;

/// Failures while answering a chat message.
///
/// Only the quota variants abort the request; the others are reported to
/// the client as error events on the reply stream.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("You have reached your chat limit of {limit} messages. Please register to continue.")]
    QuotaExceeded { limit: u32 },

    #[error("Could not verify chat quota: {0}")]
    QuotaUnavailable(DomainError),

    #[error("No AI members available for this request at the moment.")]
    NoPersonasAvailable,

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("Internal system error: unable to prepare the AI response.")]
    PersonaNotConfigured { persona_id: PersonaId },

    #[error("AI {persona_name} ran into a problem responding, please try again later.")]
    Completion {
        persona_name: String,
        #[source]
        source: AIError,
    },
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::QuotaExceeded { .. } => ErrorKind::Unauthorized,
            ChatError::QuotaUnavailable(source) => source.kind(),
            ChatError::Scheduling(err) => err.kind(),
            ChatError::NoPersonasAvailable
            | ChatError::PersonaNotConfigured { .. }
            | ChatError::Completion { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            ChatError::QuotaUnavailable(source) => source.code,
            ChatError::Scheduling(err) => err.code(),
            ChatError::NoPersonasAvailable | ChatError::PersonaNotConfigured { .. } => {
                ErrorCode::ConfigurationError
            }
            ChatError::Completion { .. } => ErrorCode::AIProviderError,
        }
    }

    /// Who an error event is attributed to when no persona is speaking.
    pub fn source_label(&self) -> &'static str {
        match self {
            ChatError::NoPersonasAvailable => "handler_setup",
            ChatError::Scheduling(_) => "scheduler",
            ChatError::PersonaNotConfigured { .. } => "handler_config",
            ChatError::QuotaExceeded { .. } | ChatError::QuotaUnavailable(_) => "quota",
            ChatError::Completion { .. } => "completion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_message_names_the_limit() {
        let err = ChatError::QuotaExceeded { limit: 10 };
        assert_eq!(
            err.to_string(),
            "You have reached your chat limit of 10 messages. Please register to continue."
        );
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn completion_error_names_persona() {
        let err = ChatError::Completion {
            persona_name: "Coach".into(),
            source: AIError::network("reset"),
        };
        assert_eq!(
            err.to_string(),
            "AI Coach ran into a problem responding, please try again later."
        );
        assert_eq!(err.code(), ErrorCode::AIProviderError);
    }
}
