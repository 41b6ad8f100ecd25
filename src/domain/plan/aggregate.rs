//! Plan and task records.

use serde::{Deserialize, Serialize};

use super::errors::PlanError;
use super::status::{PlanStatus, TaskStatus, TaskType};
use crate::domain::foundation::{PlanId, TaskId, Timestamp, UserId};

/// A habit-building plan owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub status: PlanStatus,
    pub tasks: Vec<PlanTask>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Plan {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn task(&self, task_id: TaskId) -> Option<&PlanTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }
}

/// One recurring activity inside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: TaskId,
    pub plan_id: PlanId,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    /// Free text such as "daily" or "3 times a week".
    pub frequency: String,
    /// Free text such as "15 minutes".
    pub duration: String,
    pub status: TaskStatus,
    pub completed_at: Option<Timestamp>,
    pub order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlanTask {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Marks the task completed. Returns false if it already was.
    pub fn mark_completed(&mut self, at: Timestamp) -> bool {
        if self.status == TaskStatus::Completed {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        self.updated_at = at;
        true
    }

    /// Marks the task skipped. Returns false if it already was.
    ///
    /// # Errors
    ///
    /// `PlanError::AlreadyCompleted` if the task was completed.
    pub fn mark_skipped(&mut self, at: Timestamp) -> Result<bool, PlanError> {
        match self.status {
            TaskStatus::Skipped => Ok(false),
            TaskStatus::Completed => Err(PlanError::AlreadyCompleted { task_id: self.id }),
            TaskStatus::Pending | TaskStatus::Failed => {
                self.status = TaskStatus::Skipped;
                self.completed_at = None;
                self.updated_at = at;
                Ok(true)
            }
        }
    }
}

/// Input for creating a plan; the store assigns plan and task ids.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub status: PlanStatus,
    pub tasks: Vec<NewPlanTask>,
}

/// Task part of a `NewPlan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanTask {
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    pub frequency: String,
    pub duration: String,
    pub order: i32,
}

impl NewPlan {
    /// Materialises the plan with store-assigned ids, all tasks pending.
    pub fn into_plan(self, id: PlanId, task_ids: &[TaskId], now: Timestamp) -> Plan {
        let tasks = self
            .tasks
            .into_iter()
            .zip(task_ids.iter().copied())
            .map(|(task, task_id)| PlanTask {
                id: task_id,
                plan_id: id,
                task_type: task.task_type,
                title: task.title,
                description: task.description,
                frequency: task.frequency,
                duration: task.duration,
                status: TaskStatus::Pending,
                completed_at: None,
                order: task.order,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Plan {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status: self.status,
            tasks,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}
