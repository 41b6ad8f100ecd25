//! Plan repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId, TaskId, UserId};
use crate::domain::plan::{NewPlan, Plan, PlanTask};

/// Persistence for plans and their tasks.
///
/// Plans are always returned with their tasks, ordered by `order`.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Stores a plan and its tasks, assigning ids to both.
    async fn create(&self, plan: NewPlan) -> Result<Plan, DomainError>;

    /// Returns `None` if no plan has this id.
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError>;

    /// All plans of a user, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Plan>, DomainError>;

    /// Returns `None` if no task has this id.
    async fn find_task(&self, id: TaskId) -> Result<Option<PlanTask>, DomainError>;

    /// Persists a task's status fields.
    ///
    /// # Errors
    ///
    /// - `TaskNotFound` if the task does not exist
    /// - `DatabaseError` on persistence failure
    async fn update_task(&self, task: &PlanTask) -> Result<PlanTask, DomainError>;
}
