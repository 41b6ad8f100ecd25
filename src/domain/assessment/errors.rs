//! Assessment engine errors.
//!
//! Several variants are guidance for the user rather than failures; they
//! carry the assessment and, where useful, the question the user should
//! be answering so the caller can re-prompt without another lookup.

use thiserror::Error;

use super::aggregate::Assessment;
use super::question::QuestionDefinition;
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, ErrorKind, ValidationError};

pub const NOT_IN_PROGRESS_MESSAGE: &str =
    "you do not have an assessment in progress. Would you like to start one?";
pub const ANSWER_REQUIRED_MESSAGE: &str = "this question is required. Please provide an answer";
pub const CATALOG_NOT_CONFIGURED_MESSAGE: &str = "assessment questionnaire is not configured";
pub const WELCOME_DECLINED_MESSAGE: &str =
    "Okay, we respect your choice. You can restart the assessment anytime if you change your mind.";
pub const PRIVACY_DECLINED_MESSAGE: &str = "We take your privacy very seriously. If you do not agree to the processing of your information, we cannot proceed with personalized services. The assessment has been discontinued.";

/// Errors returned by the assessment handlers.
#[derive(Debug, Clone, Error)]
pub enum AssessmentError {
    #[error("{}", NOT_IN_PROGRESS_MESSAGE)]
    NotInProgress,

    #[error("you seem to be answering a previous question. The current question is: '{}'", .expected.text)]
    WrongQuestion {
        expected: Box<QuestionDefinition>,
        assessment: Box<Assessment>,
    },

    #[error("{}", ANSWER_REQUIRED_MESSAGE)]
    AnswerRequired {
        question: Box<QuestionDefinition>,
        assessment: Box<Assessment>,
    },

    #[error("{message}")]
    Declined {
        message: &'static str,
        assessment: Box<Assessment>,
    },

    #[error("internal system error: {}", CATALOG_NOT_CONFIGURED_MESSAGE)]
    CatalogNotConfigured { assessment: Box<Assessment> },

    #[error("invalid question ID '{question_id}' submitted")]
    UnknownQuestion { question_id: String },

    #[error("internal system error processing question '{question_id}' for assessment {assessment_id}")]
    Inconsistent {
        assessment_id: AssessmentId,
        question_id: String,
    },

    #[error("failed to persist assessment: {source}")]
    Persistence {
        question: Option<Box<QuestionDefinition>>,
        assessment: Box<Assessment>,
        source: DomainError,
    },

    #[error("assessment store error: {0}")]
    Repository(DomainError),

    #[error("invalid user: {0}")]
    InvalidUser(#[from] ValidationError),
}

impl AssessmentError {
    /// Returns the closed error category for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssessmentError::NotInProgress => ErrorKind::NotFound,
            AssessmentError::WrongQuestion { .. }
            | AssessmentError::AnswerRequired { .. }
            | AssessmentError::Declined { .. }
            | AssessmentError::InvalidUser(_) => ErrorKind::Validation,
            AssessmentError::Persistence { source, .. } => source.kind(),
            AssessmentError::Repository(source) => source.kind(),
            AssessmentError::CatalogNotConfigured { .. }
            | AssessmentError::UnknownQuestion { .. }
            | AssessmentError::Inconsistent { .. } => ErrorKind::Internal,
        }
    }

    /// Returns true for outcomes the user should simply be told about.
    pub fn is_user_guidance(&self) -> bool {
        matches!(
            self,
            AssessmentError::NotInProgress
                | AssessmentError::WrongQuestion { .. }
                | AssessmentError::AnswerRequired { .. }
                | AssessmentError::Declined { .. }
        )
    }

    /// The assessment state computed before the failure, if there was one.
    pub fn assessment(&self) -> Option<&Assessment> {
        match self {
            AssessmentError::WrongQuestion { assessment, .. }
            | AssessmentError::AnswerRequired { assessment, .. }
            | AssessmentError::Declined { assessment, .. }
            | AssessmentError::CatalogNotConfigured { assessment }
            | AssessmentError::Persistence { assessment, .. } => Some(assessment.as_ref()),
            _ => None,
        }
    }

    /// The question the user should be (re)answering, if known.
    pub fn question(&self) -> Option<&QuestionDefinition> {
        match self {
            AssessmentError::WrongQuestion { expected, .. } => Some(expected.as_ref()),
            AssessmentError::AnswerRequired { question, .. } => Some(question.as_ref()),
            AssessmentError::Persistence { question, .. } => question.as_deref(),
            _ => None,
        }
    }

    /// Message safe to show to the end user.
    pub fn user_message(&self) -> String {
        if self.is_user_guidance() {
            self.to_string()
        } else {
            "Something went wrong with your assessment. Please try again later.".to_string()
        }
    }

    /// Error code used by transport adapters.
    pub fn code(&self) -> ErrorCode {
        match self {
            AssessmentError::NotInProgress => ErrorCode::AssessmentNotFound,
            AssessmentError::WrongQuestion { .. }
            | AssessmentError::AnswerRequired { .. }
            | AssessmentError::InvalidUser(_) => ErrorCode::ValidationFailed,
            AssessmentError::Declined { .. } => ErrorCode::InvalidStateTransition,
            AssessmentError::CatalogNotConfigured { .. } => ErrorCode::ConfigurationError,
            AssessmentError::Persistence { source, .. } => source.code,
            AssessmentError::Repository(source) => source.code,
            AssessmentError::UnknownQuestion { .. } | AssessmentError::Inconsistent { .. } => {
                ErrorCode::InternalError
            }
        }
    }
}

impl From<DomainError> for AssessmentError {
    fn from(err: DomainError) -> Self {
        AssessmentError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{AssessmentStatus, QuestionCatalog};
    use crate::domain::foundation::{Timestamp, UserId};

    fn assessment() -> Box<Assessment> {
        let now = Timestamp::now();
        Box::new(Assessment::reconstitute(
            AssessmentId::new(7),
            UserId::new("u1").unwrap(),
            AssessmentStatus::InProgress,
            Some("q_age_group".into()),
            vec![],
            now,
            None,
            now,
            now,
            0,
        ))
    }

    #[test]
    fn wrong_question_message_quotes_expected_text() {
        let expected = QuestionCatalog::standard().get("q_age_group").unwrap().clone();
        let err = AssessmentError::WrongQuestion {
            expected: Box::new(expected),
            assessment: assessment(),
        };
        assert_eq!(
            err.to_string(),
            "you seem to be answering a previous question. The current question is: 'What is your age group?'"
        );
        assert_eq!(err.question().unwrap().id, "q_age_group");
        assert!(err.is_user_guidance());
    }

    #[test]
    fn declined_message_is_shown_verbatim() {
        let err = AssessmentError::Declined {
            message: WELCOME_DECLINED_MESSAGE,
            assessment: assessment(),
        };
        assert!(err.to_string().contains("respect your choice"));
        assert_eq!(err.user_message(), WELCOME_DECLINED_MESSAGE);
    }

    #[test]
    fn internal_errors_hide_details_from_user() {
        let err = AssessmentError::Inconsistent {
            assessment_id: AssessmentId::new(3),
            question_id: "q_x".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.user_message().contains("q_x"));
    }

    #[test]
    fn persistence_error_keeps_computed_state_and_source_kind() {
        let err = AssessmentError::Persistence {
            question: None,
            assessment: assessment(),
            source: DomainError::new(ErrorCode::ConcurrencyConflict, "stale"),
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.assessment().unwrap().id(), AssessmentId::new(7));
    }

    #[test]
    fn not_in_progress_is_not_found_guidance() {
        let err = AssessmentError::NotInProgress;
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), NOT_IN_PROGRESS_MESSAGE);
    }
}
