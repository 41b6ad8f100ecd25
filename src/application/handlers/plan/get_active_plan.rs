//! GetActivePlanHandler - Query handler for a user's active plan.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::plan::{Plan, PlanError, PlanStatus};
use crate::ports::PlanRepository;

/// Query for the active plan of a user.
#[derive(Debug, Clone)]
pub struct GetActivePlanQuery {
    pub user_id: UserId,
}

/// Handler returning the newest active plan, if any.
pub struct GetActivePlanHandler {
    repository: Arc<dyn PlanRepository>,
}

impl GetActivePlanHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetActivePlanQuery) -> Result<Option<Plan>, PlanError> {
        let plans = self.repository.find_by_user(&query.user_id).await?;
        let active = plans.into_iter().find(|p| p.status == PlanStatus::Active);
        if active.is_none() {
            tracing::info!(user_id = %query.user_id, "no active plan");
        }
        Ok(active)
    }
}
