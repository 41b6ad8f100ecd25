//! Plan command and query handlers.

mod complete_task;
mod generate_plan;
mod get_active_plan;
mod get_plan_details;
mod list_user_plans;
mod skip_task;

#[cfg(test)]
pub(crate) mod test_support;

pub use complete_task::{CompleteTaskCommand, CompleteTaskHandler};
pub use generate_plan::{GeneratePlanCommand, GeneratePlanHandler};
pub use get_active_plan::{GetActivePlanHandler, GetActivePlanQuery};
pub use get_plan_details::{GetPlanDetailsHandler, GetPlanDetailsQuery};
pub use list_user_plans::{ListUserPlansHandler, ListUserPlansQuery};
pub use skip_task::{SkipTaskCommand, SkipTaskHandler};

use tracing::warn;

use crate::domain::foundation::{TaskId, UserId};
use crate::domain::plan::{PlanError, PlanTask};
use crate::ports::PlanRepository;

/// Loads a task and checks that `user_id` owns its plan.
async fn load_owned_task(
    repository: &dyn PlanRepository,
    task_id: TaskId,
    user_id: &UserId,
) -> Result<PlanTask, PlanError> {
    let task = repository
        .find_task(task_id)
        .await?
        .ok_or(PlanError::TaskNotFound(task_id))?;

    let plan = repository
        .find_by_id(task.plan_id)
        .await?
        .ok_or(PlanError::OrphanTask { task_id })?;

    if !plan.is_owned_by(user_id) {
        warn!(task_id = %task_id, user_id = %user_id, owner = %plan.user_id, "task modification by non-owner");
        return Err(PlanError::Forbidden { task_id });
    }
    Ok(task)
}
