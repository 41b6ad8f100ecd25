//! In-memory plan store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, TaskId, Timestamp, UserId};
use crate::domain::plan::{NewPlan, Plan, PlanTask};
use crate::ports::PlanRepository;

#[derive(Debug, Default)]
struct Plans {
    /// Creation order.
    plans: Vec<Plan>,
    last_plan_id: i64,
    last_task_id: i64,
}

/// In-memory `PlanRepository`. Plan and task ids are sequential from 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanRepository {
    state: Arc<RwLock<Plans>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn create(&self, plan: NewPlan) -> Result<Plan, DomainError> {
        let mut state = self.state.write().await;
        state.last_plan_id += 1;
        let plan_id = PlanId::new(state.last_plan_id);

        let first_task = state.last_task_id + 1;
        state.last_task_id += plan.tasks.len() as i64;
        let task_ids: Vec<TaskId> = (first_task..=state.last_task_id).map(TaskId::new).collect();

        let mut stored = plan.into_plan(plan_id, &task_ids, Timestamp::now());
        stored.tasks.sort_by_key(|t| t.order);
        state.plans.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.state.read().await.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Plan>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .plans
            .iter()
            .rev()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<PlanTask>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .plans
            .iter()
            .find_map(|p| p.task(id))
            .cloned())
    }

    async fn update_task(&self, task: &PlanTask) -> Result<PlanTask, DomainError> {
        let mut state = self.state.write().await;
        let slot = state
            .plans
            .iter_mut()
            .flat_map(|p| p.tasks.iter_mut())
            .find(|t| t.id == task.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::TaskNotFound, format!("task with ID {} not found", task.id))
            })?;

        slot.status = task.status;
        slot.completed_at = task.completed_at;
        slot.updated_at = Timestamp::now();
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::{default_plan, TaskStatus};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_plan_and_task_ids() {
        let repo = InMemoryPlanRepository::new();

        let first = repo.create(default_plan(user("u1"))).await.unwrap();
        let second = repo.create(default_plan(user("u1"))).await.unwrap();

        assert_eq!(first.id, PlanId::new(1));
        assert_eq!(second.id, PlanId::new(2));
        let task_ids: Vec<i64> = second.tasks.iter().map(|t| t.id.as_i64()).collect();
        assert_eq!(task_ids, vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn find_by_user_is_newest_first() {
        let repo = InMemoryPlanRepository::new();
        let old = repo.create(default_plan(user("u1"))).await.unwrap();
        repo.create(default_plan(user("u2"))).await.unwrap();
        let new = repo.create(default_plan(user("u1"))).await.unwrap();

        let ids: Vec<PlanId> = repo
            .find_by_user(&user("u1"))
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![new.id, old.id]);
    }

    #[tokio::test]
    async fn update_task_is_visible_through_its_plan() {
        let repo = InMemoryPlanRepository::new();
        let plan = repo.create(default_plan(user("u1"))).await.unwrap();

        let mut task = repo.find_task(plan.tasks[1].id).await.unwrap().unwrap();
        task.mark_completed(Timestamp::now());
        repo.update_task(&task).await.unwrap();

        let reloaded = repo.find_by_id(plan.id).await.unwrap().unwrap();
        assert_eq!(reloaded.tasks[1].status, TaskStatus::Completed);
        assert_eq!(reloaded.tasks[0].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_task_update_fails() {
        let repo = InMemoryPlanRepository::new();
        let plan = repo.create(default_plan(user("u1"))).await.unwrap();
        let mut task = plan.tasks[0].clone();
        task.id = TaskId::new(999);

        let err = repo.update_task(&task).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }
}
