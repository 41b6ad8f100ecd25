//! SkipTaskHandler - Marks a plan task as skipped.

use std::sync::Arc;

use tracing::info;

use super::load_owned_task;
use crate::domain::foundation::{TaskId, Timestamp, UserId};
use crate::domain::plan::{PlanError, PlanTask};
use crate::ports::PlanRepository;

/// Command to skip a task.
#[derive(Debug, Clone)]
pub struct SkipTaskCommand {
    pub task_id: TaskId,
    pub user_id: UserId,
}

/// Handler for skipping tasks. Completed tasks cannot be skipped.
pub struct SkipTaskHandler {
    repository: Arc<dyn PlanRepository>,
}

impl SkipTaskHandler {
    pub fn new(repository: Arc<dyn PlanRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: SkipTaskCommand) -> Result<PlanTask, PlanError> {
        let mut task = load_owned_task(self.repository.as_ref(), cmd.task_id, &cmd.user_id).await?;

        if !task.mark_skipped(Timestamp::now())? {
            return Ok(task);
        }

        let task = self.repository.update_task(&task).await?;
        info!(task_id = %task.id, user_id = %cmd.user_id, "task skipped");
        Ok(task)
    }
}
