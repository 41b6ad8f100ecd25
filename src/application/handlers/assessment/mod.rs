//! Assessment engine handlers.
//!
//! Each handler performs at most one read-modify-write cycle against the
//! assessment store. Concurrent writes for the same assessment surface as
//! `ConcurrencyConflict` through the store's version check.

mod get_result;
mod start_or_continue;
mod submit_answer;

#[cfg(test)]
pub(crate) mod test_support;

pub use get_result::{GetResultHandler, GetResultQuery};
pub use start_or_continue::{StartOrContinueCommand, StartOrContinueHandler};
pub use submit_answer::{SubmitAnswerCommand, SubmitAnswerHandler};

use crate::domain::assessment::{Assessment, AssessmentError, QuestionDefinition};
use crate::ports::AssessmentRepository;

/// Outcome of a successful engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentStep {
    /// Question to present next; `None` once the assessment is terminal.
    pub question: Option<QuestionDefinition>,
    pub assessment: Assessment,
}

impl AssessmentStep {
    pub fn is_finished(&self) -> bool {
        self.question.is_none()
    }
}

/// Writes `assessment` back, keeping the computed state on failure.
async fn persist(
    repository: &dyn AssessmentRepository,
    assessment: Assessment,
    question: Option<QuestionDefinition>,
) -> Result<AssessmentStep, AssessmentError> {
    match repository.update(&assessment).await {
        Ok(persisted) => Ok(AssessmentStep {
            question,
            assessment: persisted,
        }),
        Err(source) => {
            tracing::error!(
                assessment_id = %assessment.id(),
                error = %source,
                "failed to persist assessment"
            );
            Err(AssessmentError::Persistence {
                question: question.map(Box::new),
                assessment: Box::new(assessment),
                source,
            })
        }
    }
}

/// Completes an assessment that cannot progress because the catalog is empty.
async fn close_unconfigured(
    repository: &dyn AssessmentRepository,
    mut assessment: Assessment,
) -> AssessmentError {
    tracing::error!(assessment_id = %assessment.id(), "question catalog is empty");
    if let Err(err) = assessment.complete() {
        return err.into();
    }
    let assessment = match repository.update(&assessment).await {
        Ok(persisted) => persisted,
        Err(err) => {
            tracing::error!(
                assessment_id = %assessment.id(),
                error = %err,
                "failed to persist unconfigured assessment"
            );
            assessment
        }
    };
    AssessmentError::CatalogNotConfigured {
        assessment: Box::new(assessment),
    }
}
