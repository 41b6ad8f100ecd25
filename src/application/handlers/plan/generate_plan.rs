//! GeneratePlanHandler - Creates the starter plan for a user.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::UserId;
use crate::domain::plan::{default_plan, Plan, PlanError};
use crate::ports::PlanRepository;

/// Command to generate a new plan.
#[derive(Debug, Clone)]
pub struct GeneratePlanCommand {
    pub user_id: UserId,
}

/// Handler for plan generation.
pub struct GeneratePlanHandler {
    repository: Arc<dyn PlanRepository>,
}

impl GeneratePlanHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: GeneratePlanCommand) -> Result<Plan, PlanError> {
        let plan = self.repository.create(default_plan(cmd.user_id)).await?;
        info!(plan_id = %plan.id, user_id = %plan.user_id, tasks = plan.tasks.len(), "plan generated");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::plan::test_support::MockPlanRepository;
    use crate::domain::plan::{PlanStatus, TaskStatus, KEGEL_TASK_TITLE};

    #[tokio::test]
    async fn creates_active_plan_with_three_pending_tasks() {
        let repo = Arc::new(MockPlanRepository::new());
        let handler = GeneratePlanHandler::new(repo.clone());

        let plan = handler
            .handle(GeneratePlanCommand {
                user_id: UserId::new("u1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(plan.status, PlanStatus::Active);
        assert_eq!(plan.tasks.len(), 3);
        assert_eq!(plan.tasks[0].title, KEGEL_TASK_TITLE);
        assert!(plan.tasks.iter().all(|t| t.status == TaskStatus::Pending));
        assert!(plan.tasks.iter().all(|t| t.plan_id == plan.id));
        assert_eq!(repo.plans.lock().unwrap().len(), 1);
    }
}
