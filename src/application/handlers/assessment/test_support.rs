//! In-process assessment store used by the engine handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::assessment::{Answer, Assessment, AssessmentStatus, NewAssessment};
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AssessmentRepository;

pub(crate) struct MockAssessmentRepository {
    pub assessments: Mutex<Vec<Assessment>>,
    pub fail_update: bool,
    pub fail_lookup: bool,
    pub updates: Mutex<u32>,
}

impl MockAssessmentRepository {
    pub fn new() -> Self {
        Self {
            assessments: Mutex::new(Vec::new()),
            fail_update: false,
            fail_lookup: false,
            updates: Mutex::new(0),
        }
    }

    pub fn failing_update() -> Self {
        Self {
            fail_update: true,
            ..Self::new()
        }
    }

    pub fn failing_lookup() -> Self {
        Self {
            fail_lookup: true,
            ..Self::new()
        }
    }

    pub fn with(assessment: Assessment) -> Self {
        let repo = Self::new();
        repo.assessments.lock().unwrap().push(assessment);
        repo
    }

    pub fn stored(&self, id: AssessmentId) -> Option<Assessment> {
        self.assessments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id() == id)
            .cloned()
    }

    pub fn update_count(&self) -> u32 {
        *self.updates.lock().unwrap()
    }
}

/// An in-progress assessment for `user` pointed at `question_id`.
pub(crate) fn in_progress(
    id: i64,
    user: &str,
    question_id: Option<&str>,
    answers: &[(&str, &str)],
) -> Assessment {
    let now = Timestamp::now();
    Assessment::reconstitute(
        AssessmentId::new(id),
        UserId::new(user).unwrap(),
        AssessmentStatus::InProgress,
        question_id.map(str::to_string),
        answers
            .iter()
            .map(|(q, value)| Answer {
                question_id: q.to_string(),
                values: vec![value.to_string()],
            })
            .collect(),
        now,
        None,
        now,
        now,
        0,
    )
}

#[async_trait]
impl AssessmentRepository for MockAssessmentRepository {
    async fn create(&self, new: NewAssessment) -> Result<Assessment, DomainError> {
        let mut assessments = self.assessments.lock().unwrap();
        let id = AssessmentId::new(assessments.len() as i64 + 1);
        let assessment = Assessment::reconstitute(
            id,
            new.user_id,
            AssessmentStatus::InProgress,
            None,
            vec![],
            new.started_at,
            None,
            new.started_at,
            new.started_at,
            0,
        );
        assessments.push(assessment.clone());
        Ok(assessment)
    }

    async fn find_by_id(&self, id: AssessmentId) -> Result<Option<Assessment>, DomainError> {
        Ok(self.stored(id))
    }

    async fn find_latest_by_user(
        &self,
        user_id: &UserId,
        status: Option<AssessmentStatus>,
    ) -> Result<Option<Assessment>, DomainError> {
        if self.fail_lookup {
            return Err(DomainError::new(ErrorCode::DatabaseError, "lookup failed"));
        }
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id() == user_id)
            .filter(|a| status.map_or(true, |s| a.status() == s))
            .max_by_key(|a| *a.updated_at())
            .cloned())
    }

    async fn update(&self, assessment: &Assessment) -> Result<Assessment, DomainError> {
        if self.fail_update {
            return Err(DomainError::new(ErrorCode::DatabaseError, "simulated failure"));
        }
        let mut assessments = self.assessments.lock().unwrap();
        let slot = assessments
            .iter_mut()
            .find(|a| a.id() == assessment.id())
            .ok_or_else(|| DomainError::new(ErrorCode::AssessmentNotFound, "missing"))?;
        let mut updated = assessment.clone();
        updated.adopt_identity_of(slot);
        updated.mark_persisted(Timestamp::now());
        *slot = updated.clone();
        *self.updates.lock().unwrap() += 1;
        Ok(updated)
    }
}
