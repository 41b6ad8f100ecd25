//! GetResultHandler - Query handler for a user's completed assessment.

use std::sync::Arc;

use crate::domain::assessment::{Assessment, AssessmentError, AssessmentStatus};
use crate::domain::foundation::UserId;
use crate::ports::AssessmentRepository;

/// Query for the most recently completed assessment of a user.
#[derive(Debug, Clone)]
pub struct GetResultQuery {
    pub user_id: UserId,
}

/// Handler for retrieving assessment results.
pub struct GetResultHandler {
    repository: Arc<dyn AssessmentRepository>,
}

impl GetResultHandler {
    pub fn new(repository: Arc<dyn AssessmentRepository>) -> Self {
        Self { repository }
    }

    /// Returns `None` when the user has never completed an assessment.
    pub async fn handle(&self, query: GetResultQuery) -> Result<Option<Assessment>, AssessmentError> {
        let result = self
            .repository
            .find_latest_by_user(&query.user_id, Some(AssessmentStatus::Completed))
            .await?;

        if result.is_none() {
            tracing::debug!(user_id = %query.user_id, "no completed assessment");
        }
        Ok(result)
    }
}
