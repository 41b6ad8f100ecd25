//! SubmitAnswerHandler - Records an answer and moves the assessment forward.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{close_unconfigured, persist, AssessmentStep};
use crate::domain::assessment::{
    declining_message, AssessmentError, AssessmentStatus, QuestionCatalog,
};
use crate::domain::foundation::UserId;
use crate::ports::AssessmentRepository;

/// Command to answer the assessment's current question.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub user_id: UserId,
    pub question_id: String,
    pub values: Vec<String>,
}

/// Handler for submitting assessment answers.
pub struct SubmitAnswerHandler {
    repository: Arc<dyn AssessmentRepository>,
    catalog: QuestionCatalog,
}

impl SubmitAnswerHandler {
    pub fn new(repository: Arc<dyn AssessmentRepository>, catalog: QuestionCatalog) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub async fn handle(&self, cmd: SubmitAnswerCommand) -> Result<AssessmentStep, AssessmentError> {
        // 1. Load the in-progress assessment
        let mut assessment = self
            .repository
            .find_latest_by_user(&cmd.user_id, Some(AssessmentStatus::InProgress))
            .await?
            .ok_or_else(|| {
                warn!(user_id = %cmd.user_id, question_id = %cmd.question_id, "answer without assessment in progress");
                AssessmentError::NotInProgress
            })?;

        if self.catalog.is_empty() {
            return Err(close_unconfigured(self.repository.as_ref(), assessment).await);
        }

        // 2. Positioning: the current question, or the first one before any pointer exists
        let positioned = match assessment.current_question_id() {
            Some(current) => current == cmd.question_id,
            None => self
                .catalog
                .first()
                .is_some_and(|first| first.id == cmd.question_id),
        };
        if !positioned {
            let expected = match assessment.current_question_id() {
                Some(current) => self.catalog.get(current),
                None => self.catalog.first(),
            };
            return match expected {
                Some(expected) => {
                    warn!(
                        assessment_id = %assessment.id(),
                        submitted = %cmd.question_id,
                        expected = %expected.id,
                        "answer for a question other than the current one"
                    );
                    Err(AssessmentError::WrongQuestion {
                        expected: Box::new(expected.clone()),
                        assessment: Box::new(assessment),
                    })
                }
                None => {
                    error!(
                        assessment_id = %assessment.id(),
                        current = ?assessment.current_question_id(),
                        "current question not found in catalog"
                    );
                    Err(AssessmentError::Inconsistent {
                        assessment_id: assessment.id(),
                        question_id: assessment.current_question_id().unwrap_or_default().to_string(),
                    })
                }
            };
        }

        // 3. Resolve the definition
        let Some(question) = self.catalog.get(&cmd.question_id).cloned() else {
            error!(assessment_id = %assessment.id(), question_id = %cmd.question_id, "submitted question not in catalog");
            return Err(AssessmentError::UnknownQuestion {
                question_id: cmd.question_id,
            });
        };

        // 4. Required answers
        if question.is_missing_answer(&cmd.values) {
            info!(assessment_id = %assessment.id(), question_id = %question.id, "required answer missing");
            return Err(AssessmentError::AnswerRequired {
                question: Box::new(question),
                assessment: Box::new(assessment),
            });
        }

        // 5. Declining answers cancel the assessment
        if let Some(message) = declining_message(&question.id, &cmd.values) {
            assessment.cancel()?;
            info!(assessment_id = %assessment.id(), question_id = %question.id, "assessment declined");
            let assessment = match self.repository.update(&assessment).await {
                Ok(persisted) => persisted,
                Err(err) => {
                    error!(assessment_id = %assessment.id(), error = %err, "failed to persist cancellation");
                    assessment
                }
            };
            return Err(AssessmentError::Declined {
                message,
                assessment: Box::new(assessment),
            });
        }

        // 6. Record the answer and advance
        assessment.record_answer(&question.id, cmd.values)?;

        let Some(idx) = self.catalog.position(&question.id) else {
            error!(assessment_id = %assessment.id(), question_id = %question.id, "question lost its catalog position");
            return Err(AssessmentError::Inconsistent {
                assessment_id: assessment.id(),
                question_id: question.id,
            });
        };
        let next = self.catalog.after(idx).cloned();
        assessment.advance(next.as_ref())?;

        match &next {
            Some(next) => info!(assessment_id = %assessment.id(), next = %next.id, "answer recorded"),
            None => info!(assessment_id = %assessment.id(), "assessment completed"),
        }

        persist(self.repository.as_ref(), assessment, next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::assessment::test_support::{
        in_progress, MockAssessmentRepository,
    };
    use crate::application::handlers::assessment::{
        StartOrContinueCommand, StartOrContinueHandler,
    };
    use crate::domain::assessment::{
        PRIVACY_CONSENT_QUESTION_ID, PRIVACY_DECLINE_OPTION, PRIVACY_DECLINED_MESSAGE,
        WELCOME_DECLINE_OPTION,
    };
    use crate::domain::foundation::{AssessmentId, ErrorKind};

    fn handler(repo: Arc<MockAssessmentRepository>) -> SubmitAnswerHandler {
        SubmitAnswerHandler::new(repo, QuestionCatalog::standard())
    }

    fn answer(question_id: &str, values: &[&str]) -> SubmitAnswerCommand {
        SubmitAnswerCommand {
            user_id: UserId::new("u1").unwrap(),
            question_id: question_id.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn at(question_id: &str) -> Arc<MockAssessmentRepository> {
        Arc::new(MockAssessmentRepository::with(in_progress(
            1,
            "u1",
            Some(question_id),
            &[],
        )))
    }

    #[tokio::test]
    async fn welcome_answer_advances_to_age_group() {
        let repo = at("q_welcome");

        let step = handler(repo.clone())
            .handle(answer("q_welcome", &["Yes, I'm ready"]))
            .await
            .unwrap();

        assert_eq!(step.question.unwrap().id, "q_age_group");
        assert_eq!(step.assessment.current_question_id(), Some("q_age_group"));
        assert_eq!(step.assessment.answers().len(), 1);
        assert_eq!(repo.stored(AssessmentId::new(1)).unwrap().answers().len(), 1);
    }

    #[tokio::test]
    async fn empty_catalog_is_reported_as_configuration_error() {
        let repo = Arc::new(MockAssessmentRepository::with(in_progress(1, "u1", None, &[])));
        let handler = SubmitAnswerHandler::new(repo.clone(), QuestionCatalog::empty());

        let err = handler.handle(answer("q_welcome", &["Yes, I'm ready"])).await.unwrap_err();

        assert!(matches!(err, AssessmentError::CatalogNotConfigured { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
        let stored = repo.stored(AssessmentId::new(1)).unwrap();
        assert_eq!(stored.status(), AssessmentStatus::Completed);
        assert!(stored.answers().is_empty());
    }

    #[tokio::test]
    async fn declining_welcome_cancels() {
        let repo = at("q_welcome");

        let err = handler(repo.clone())
            .handle(answer("q_welcome", &[WELCOME_DECLINE_OPTION]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("respect your choice"));
        let assessment = err.assessment().unwrap();
        assert_eq!(assessment.status(), AssessmentStatus::Cancelled);
        assert_eq!(assessment.current_question_id(), None);
        assert_eq!(
            repo.stored(AssessmentId::new(1)).unwrap().status(),
            AssessmentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn declining_privacy_consent_cancels() {
        let repo = at(PRIVACY_CONSENT_QUESTION_ID);

        let err = handler(repo)
            .handle(answer(PRIVACY_CONSENT_QUESTION_ID, &[PRIVACY_DECLINE_OPTION]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), PRIVACY_DECLINED_MESSAGE);
        assert!(err.is_user_guidance());
    }

    #[tokio::test]
    async fn first_question_accepted_before_positioning() {
        let repo = Arc::new(MockAssessmentRepository::with(in_progress(1, "u1", None, &[])));

        let step = handler(repo)
            .handle(answer("q_welcome", &["Yes, I'm ready"]))
            .await
            .unwrap();

        assert_eq!(step.question.unwrap().id, "q_age_group");
    }

    #[tokio::test]
    async fn wrong_question_returns_expected_without_mutation() {
        let repo = at("q_age_group");

        let err = handler(repo.clone())
            .handle(answer("q_welcome", &["Yes, I'm ready"]))
            .await
            .unwrap_err();

        assert!(matches!(err, AssessmentError::WrongQuestion { .. }));
        assert_eq!(err.question().unwrap().id, "q_age_group");
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn blank_required_answer_is_rejected() {
        let repo = at("q_age_group");

        let err = handler(repo.clone())
            .handle(answer("q_age_group", &["   "]))
            .await
            .unwrap_err();

        assert!(matches!(err, AssessmentError::AnswerRequired { .. }));
        assert_eq!(err.question().unwrap().id, "q_age_group");
        assert!(err.assessment().unwrap().answers().is_empty());
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn no_assessment_is_user_guidance() {
        let repo = Arc::new(MockAssessmentRepository::new());

        let err = handler(repo)
            .handle(answer("q_welcome", &["Yes, I'm ready"]))
            .await
            .unwrap_err();

        assert!(matches!(err, AssessmentError::NotInProgress));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn final_answer_completes_and_start_reports_terminal() {
        let catalog = QuestionCatalog::standard();
        let last = catalog.questions().last().unwrap().id.clone();
        let repo = at(&last);

        let step = handler(repo.clone())
            .handle(answer(&last, &["I agree"]))
            .await
            .unwrap();

        assert!(step.question.is_none());
        assert_eq!(step.assessment.status(), AssessmentStatus::Completed);
        assert!(step.assessment.completed_at().is_some());

        // The completed record is no longer "in progress"; a further submit finds nothing.
        let err = handler(repo.clone())
            .handle(answer(&last, &["I agree"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::NotInProgress));
        assert_eq!(
            repo.stored(AssessmentId::new(1)).unwrap().answers().len(),
            1
        );
    }

    #[tokio::test]
    async fn resubmitting_overwrites_answer() {
        let repo = Arc::new(MockAssessmentRepository::with(in_progress(
            1,
            "u1",
            Some("q_age_group"),
            &[("q_age_group", "18-24 years")],
        )));

        let step = handler(repo)
            .handle(answer("q_age_group", &["25-34 years"]))
            .await
            .unwrap();

        let answers = step.assessment.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].values, vec!["25-34 years"]);
    }

    #[tokio::test]
    async fn persistence_failure_carries_next_question() {
        let repo = Arc::new(MockAssessmentRepository::failing_update());
        repo.assessments
            .lock()
            .unwrap()
            .push(in_progress(1, "u1", Some("q_welcome"), &[]));

        let err = handler(repo)
            .handle(answer("q_welcome", &["Yes, I'm ready"]))
            .await
            .unwrap_err();

        assert_eq!(err.question().unwrap().id, "q_age_group");
        assert_eq!(err.assessment().unwrap().answers().len(), 1);
    }

    #[tokio::test]
    async fn full_walk_through_standard_catalog() {
        let repo = Arc::new(MockAssessmentRepository::new());
        let start = StartOrContinueHandler::new(repo.clone(), QuestionCatalog::standard());
        let submit = handler(repo);

        let mut step = start
            .handle(StartOrContinueCommand {
                user_id: UserId::new("u1").unwrap(),
            })
            .await
            .unwrap();
        let mut seen = Vec::new();

        while let Some(question) = step.question.clone() {
            seen.push(question.id.clone());
            let value = question
                .options
                .first()
                .cloned()
                .unwrap_or_else(|| "42".to_string());
            step = submit
                .handle(answer(&question.id, &[value.as_str()]))
                .await
                .unwrap();
        }

        let expected: Vec<_> = QuestionCatalog::standard()
            .questions()
            .iter()
            .map(|q| q.id.clone())
            .collect();
        assert_eq!(seen, expected);
        assert_eq!(step.assessment.status(), AssessmentStatus::Completed);
    }
}
