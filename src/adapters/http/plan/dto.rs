//! HTTP DTOs for plan endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::plan::{Plan, PlanStatus, PlanTask, TaskStatus, TaskType};

/// Body carrying the acting user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub plan_id: i64,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    pub frequency: String,
    pub duration: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub order: i32,
    pub created_at: String,
    pub updated_at: String,
}

fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

impl From<PlanTask> for TaskResponse {
    fn from(task: PlanTask) -> Self {
        Self {
            id: task.id.as_i64(),
            plan_id: task.plan_id.as_i64(),
            task_type: task.task_type,
            title: task.title,
            description: task.description,
            frequency: task.frequency,
            duration: task.duration,
            status: task.status,
            completed_at: task.completed_at.as_ref().map(rfc3339),
            order: task.order,
            created_at: rfc3339(&task.created_at),
            updated_at: rfc3339(&task.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: PlanStatus,
    pub tasks: Vec<TaskResponse>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.as_i64(),
            user_id: plan.user_id.to_string(),
            title: plan.title,
            description: plan.description,
            status: plan.status,
            tasks: plan.tasks.into_iter().map(Into::into).collect(),
            created_at: rfc3339(&plan.created_at),
            updated_at: rfc3339(&plan.updated_at),
            completed_at: plan.completed_at.as_ref().map(rfc3339),
        }
    }
}
