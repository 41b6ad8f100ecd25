//! GetPlanDetailsHandler - Query handler for one plan with its tasks.

use std::sync::Arc;

use crate::domain::foundation::PlanId;
use crate::domain::plan::{Plan, PlanError};
use crate::ports::PlanRepository;

/// Query for a plan by id.
#[derive(Debug, Clone)]
pub struct GetPlanDetailsQuery {
    pub plan_id: PlanId,
}

/// Handler for plan details.
pub struct GetPlanDetailsHandler {
    repository: Arc<dyn PlanRepository>,
}

impl GetPlanDetailsHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetPlanDetailsQuery) -> Result<Plan, PlanError> {
        self.repository
            .find_by_id(query.plan_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(plan_id = %query.plan_id, "plan not found");
                PlanError::PlanNotFound(query.plan_id)
            })
    }
}
