//! ListUserPlansHandler - Query handler for all plans of a user.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::plan::{Plan, PlanError};
use crate::ports::PlanRepository;

/// Query for a user's plans.
#[derive(Debug, Clone)]
pub struct ListUserPlansQuery {
    pub user_id: UserId,
}

/// Handler for listing plans, newest first.
pub struct ListUserPlansHandler {
    repository: Arc<dyn PlanRepository>,
}

impl ListUserPlansHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListUserPlansQuery) -> Result<Vec<Plan>, PlanError> {
        Ok(self.repository.find_by_user(&query.user_id).await?)
    }
}
