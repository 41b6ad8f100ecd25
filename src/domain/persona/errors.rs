//! Responder selection errors.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ErrorKind, PersonaId};

/// Failures of responder selection.
///
/// Classifier outages and store lookups during the assessment check
/// degrade silently; only a misconfiguration that would let the wrong
/// persona answer mid-assessment surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("assessment agent '{persona_id}' is currently unavailable. Please try again later or contact support")]
    AssessmentPersonaUnavailable { persona_id: PersonaId },
}

impl SchedulingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchedulingError::AssessmentPersonaUnavailable { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SchedulingError::AssessmentPersonaUnavailable { .. } => ErrorCode::ConfigurationError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_assessor_message_names_persona() {
        let err = SchedulingError::AssessmentPersonaUnavailable {
            persona_id: PersonaId::new("hs_profile_assessment_agent").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "assessment agent 'hs_profile_assessment_agent' is currently unavailable. Please try again later or contact support"
        );
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
