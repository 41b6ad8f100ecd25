//! StartOrContinueHandler - Opens an assessment or re-presents where the user stands.

use std::sync::Arc;

use tracing::{info, warn};

use super::{close_unconfigured, persist, AssessmentStep};
use crate::domain::assessment::{
    AssessmentError, AssessmentStatus, NewAssessment, QuestionCatalog,
};
use crate::domain::foundation::UserId;
use crate::ports::AssessmentRepository;

/// Command to start a new assessment or continue the current one.
#[derive(Debug, Clone)]
pub struct StartOrContinueCommand {
    pub user_id: UserId,
}

/// Handler for starting or continuing an assessment.
pub struct StartOrContinueHandler {
    repository: Arc<dyn AssessmentRepository>,
    catalog: QuestionCatalog,
}

/// Where the pointer goes next.
enum Target {
    First,
    Repeat(usize),
    After(usize),
}

impl StartOrContinueHandler {
    pub fn new(repository: Arc<dyn AssessmentRepository>, catalog: QuestionCatalog) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartOrContinueCommand,
    ) -> Result<AssessmentStep, AssessmentError> {
        // 1. Find or open the in-progress assessment
        let existing = self
            .repository
            .find_latest_by_user(&cmd.user_id, Some(AssessmentStatus::InProgress))
            .await?;

        let mut assessment = match existing {
            Some(assessment) => assessment,
            None => {
                let created = self
                    .repository
                    .create(NewAssessment::starting_now(cmd.user_id.clone()))
                    .await?;
                info!(user_id = %cmd.user_id, assessment_id = %created.id(), "assessment created");
                created
            }
        };

        // 2. Terminal assessments are returned untouched
        if assessment.is_terminal() {
            return Ok(AssessmentStep {
                question: None,
                assessment,
            });
        }

        // 3. Work out the next question
        let target = match assessment.current_question_id() {
            None => Target::First,
            Some(current) => match self.catalog.position(current) {
                None => {
                    warn!(
                        assessment_id = %assessment.id(),
                        question_id = current,
                        "current question no longer in catalog, restarting from the first question"
                    );
                    Target::First
                }
                Some(idx) if !assessment.has_answer_for(current) => Target::Repeat(idx),
                Some(idx) => Target::After(idx),
            },
        };

        match target {
            Target::Repeat(idx) => Ok(AssessmentStep {
                question: self.catalog.questions().get(idx).cloned(),
                assessment,
            }),
            Target::First => {
                let Some(first) = self.catalog.first().cloned() else {
                    return Err(close_unconfigured(self.repository.as_ref(), assessment).await);
                };
                assessment.position_at(&first.id)?;
                persist(self.repository.as_ref(), assessment, Some(first)).await
            }
            Target::After(idx) => {
                let next = self.catalog.after(idx).cloned();
                assessment.advance(next.as_ref())?;
                if next.is_none() {
                    info!(assessment_id = %assessment.id(), "assessment completed");
                }
                persist(self.repository.as_ref(), assessment, next).await
            }
        }
    }
}
