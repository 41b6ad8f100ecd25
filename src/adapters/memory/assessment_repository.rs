//! In-memory assessment store with versioned updates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::assessment::{Assessment, AssessmentStatus, NewAssessment};
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AssessmentRepository;

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<AssessmentId, Assessment>,
    /// Ids per user in creation order.
    by_user: HashMap<UserId, Vec<AssessmentId>>,
    last_id: i64,
}

/// In-memory `AssessmentRepository`.
///
/// Ids are assigned sequentially from 1. Reads return clones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssessmentRepository {
    records: Arc<RwLock<Records>>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn create(&self, new: NewAssessment) -> Result<Assessment, DomainError> {
        let mut records = self.records.write().await;
        records.last_id += 1;
        let id = AssessmentId::new(records.last_id);

        let assessment = Assessment::reconstitute(
            id,
            new.user_id.clone(),
            AssessmentStatus::InProgress,
            None,
            Vec::new(),
            new.started_at,
            None,
            new.started_at,
            new.started_at,
            0,
        );
        records.by_id.insert(id, assessment.clone());
        records.by_user.entry(new.user_id).or_default().push(id);
        Ok(assessment)
    }

    async fn find_by_id(&self, id: AssessmentId) -> Result<Option<Assessment>, DomainError> {
        Ok(self.records.read().await.by_id.get(&id).cloned())
    }

    async fn find_latest_by_user(
        &self,
        user_id: &UserId,
        status: Option<AssessmentStatus>,
    ) -> Result<Option<Assessment>, DomainError> {
        let records = self.records.read().await;
        let Some(ids) = records.by_user.get(user_id) else {
            return Ok(None);
        };
        Ok(ids
            .iter()
            .filter_map(|id| records.by_id.get(id))
            .filter(|a| status.map_or(true, |s| a.status() == s))
            // later ids win ties on updated_at
            .max_by_key(|a| (*a.updated_at(), a.id()))
            .cloned())
    }

    async fn update(&self, assessment: &Assessment) -> Result<Assessment, DomainError> {
        let mut records = self.records.write().await;
        let stored = records.by_id.get_mut(&assessment.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::AssessmentNotFound,
                format!("assessment {} not found", assessment.id()),
            )
        })?;

        if stored.version() != assessment.version() {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "assessment {} was modified concurrently (stored version {}, given {})",
                    assessment.id(),
                    stored.version(),
                    assessment.version()
                ),
            ));
        }

        let mut updated = assessment.clone();
        updated.adopt_identity_of(stored);
        updated.mark_persisted(Timestamp::now());
        *stored = updated.clone();
        Ok(updated)
    }
}
