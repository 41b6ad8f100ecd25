//! CompleteTaskHandler - Marks a plan task as done.

use std::sync::Arc;

use tracing::info;

use super::load_owned_task;
use crate::domain::foundation::{TaskId, Timestamp, UserId};
use crate::domain::plan::{PlanError, PlanTask};
use crate::ports::PlanRepository;

/// Command to complete a task.
#[derive(Debug, Clone)]
pub struct CompleteTaskCommand {
    pub task_id: TaskId,
    pub user_id: UserId,
}

/// Handler for task completion.
///
/// Completing an already completed task returns it unchanged.
pub struct CompleteTaskHandler {
    repository: Arc<dyn PlanRepository>,
}

impl CompleteTaskHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CompleteTaskCommand) -> Result<PlanTask, PlanError> {
        let mut task = load_owned_task(self.repository.as_ref(), cmd.task_id, &cmd.user_id).await?;

        if !task.mark_completed(Timestamp::now()) {
            info!(task_id = %task.id, "task already completed");
            return Ok(task);
        }

        let task = self.repository.update_task(&task).await?;
        info!(task_id = %task.id, user_id = %cmd.user_id, "task completed");
        Ok(task)
    }
}
