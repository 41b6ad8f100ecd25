//! AssessmentStatus enum for tracking the questionnaire lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Lifecycle status of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

impl AssessmentStatus {
    /// Completed and cancelled assessments never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssessmentStatus::Completed | AssessmentStatus::Cancelled)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - InProgress -> Completed
    /// - InProgress -> Cancelled
    pub fn can_transition_to(&self, target: &AssessmentStatus) -> bool {
        use AssessmentStatus::*;
        matches!((self, target), (InProgress, Completed) | (InProgress, Cancelled))
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssessmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(AssessmentStatus::InProgress),
            "completed" => Ok(AssessmentStatus::Completed),
            "cancelled" => Ok(AssessmentStatus::Cancelled),
            other => Err(ValidationError::unsupported_value("status", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_in_progress() {
        assert_eq!(AssessmentStatus::default(), AssessmentStatus::InProgress);
    }

    #[test]
    fn terminal_states_are_completed_and_cancelled() {
        assert!(!AssessmentStatus::InProgress.is_terminal());
        assert!(AssessmentStatus::Completed.is_terminal());
        assert!(AssessmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn in_progress_transitions_to_terminal_states_only() {
        use AssessmentStatus::*;
        assert!(InProgress.can_transition_to(&Completed));
        assert!(InProgress.can_transition_to(&Cancelled));
        assert!(!InProgress.can_transition_to(&InProgress));
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        use AssessmentStatus::*;
        for from in [Completed, Cancelled] {
            for to in [InProgress, Completed, Cancelled] {
                assert!(!from.can_transition_to(&to));
            }
        }
    }

    #[test]
    fn round_trips_through_storage_string() {
        for status in [
            AssessmentStatus::InProgress,
            AssessmentStatus::Completed,
            AssessmentStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<AssessmentStatus>().unwrap(), status);
        }
        assert!("archived".parse::<AssessmentStatus>().is_err());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&AssessmentStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
