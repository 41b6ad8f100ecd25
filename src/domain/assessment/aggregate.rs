//! Assessment aggregate.
//!
//! One user's pass through the questionnaire. The store owns the canonical
//! copy; callers receive an owned clone, mutate it through the methods
//! below and hand it back via the repository's `update`.

use serde::{Deserialize, Serialize};

use super::question::QuestionDefinition;
use super::status::AssessmentStatus;
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, Timestamp, UserId};

/// The values a user gave for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub values: Vec<String>,
}

/// Input for creating a new assessment record; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssessment {
    pub user_id: UserId,
    pub started_at: Timestamp,
}

impl NewAssessment {
    pub fn starting_now(user_id: UserId) -> Self {
        Self {
            user_id,
            started_at: Timestamp::now(),
        }
    }
}

/// Assessment aggregate.
///
/// # Invariants
///
/// - `user_id` is non-empty
/// - at most one answer per question id
/// - completed and cancelled assessments are never modified
/// - `version` increases by one with every persisted update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    id: AssessmentId,
    user_id: UserId,
    status: AssessmentStatus,
    /// `None` means not yet positioned, or finished.
    current_question_id: Option<String>,
    answers: Vec<Answer>,
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl Assessment {
    /// Reconstitute an assessment from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AssessmentId,
        user_id: UserId,
        status: AssessmentStatus,
        current_question_id: Option<String>,
        answers: Vec<Answer>,
        started_at: Timestamp,
        completed_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            status,
            current_question_id: current_question_id.filter(|q| !q.is_empty()),
            answers,
            started_at,
            completed_at,
            created_at,
            updated_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.current_question_id.as_deref()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the answer recorded for a question, if any.
    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn has_answer_for(&self, question_id: &str) -> bool {
        self.answer_for(question_id).is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Points the assessment at the question the user must answer next.
    pub fn position_at(&mut self, question_id: &str) -> Result<(), DomainError> {
        self.ensure_in_progress()?;
        self.current_question_id = Some(question_id.to_string());
        self.touch();
        Ok(())
    }

    /// Records an answer, overwriting any earlier answer to the same question.
    pub fn record_answer(&mut self, question_id: &str, values: Vec<String>) -> Result<(), DomainError> {
        self.ensure_in_progress()?;
        match self.answers.iter_mut().find(|a| a.question_id == question_id) {
            Some(existing) => existing.values = values,
            None => self.answers.push(Answer {
                question_id: question_id.to_string(),
                values,
            }),
        }
        self.touch();
        Ok(())
    }

    /// Moves to `next`, or completes the assessment when there is none.
    pub fn advance(&mut self, next: Option<&QuestionDefinition>) -> Result<(), DomainError> {
        match next {
            Some(question) => self.position_at(&question.id),
            None => self.complete(),
        }
    }

    /// Marks the assessment completed and clears the question pointer.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition_to(AssessmentStatus::Completed)?;
        self.completed_at = Some(self.updated_at);
        Ok(())
    }

    /// Marks the assessment cancelled and clears the question pointer.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(AssessmentStatus::Cancelled)
    }

    /// Copies store-owned fields from the persisted record.
    ///
    /// Used by repositories so callers can never rewrite ownership or
    /// creation history through `update`.
    pub fn adopt_identity_of(&mut self, persisted: &Assessment) {
        self.user_id = persisted.user_id.clone();
        self.started_at = persisted.started_at;
        self.created_at = persisted.created_at;
    }

    /// Stamps a successful persistence round: new `updated_at`, next version.
    pub fn mark_persisted(&mut self, at: Timestamp) {
        self.updated_at = at;
        self.version += 1;
    }

    fn transition_to(&mut self, target: AssessmentStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot move assessment {} from {} to {}", self.id, self.status, target),
            ));
        }
        self.status = target;
        self.current_question_id = None;
        self.touch();
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Assessment {} is already {}", self.id, self.status),
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
