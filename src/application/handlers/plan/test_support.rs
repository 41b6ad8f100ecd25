//! In-process plan store used by the plan handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, TaskId, Timestamp, UserId};
use crate::domain::plan::{default_plan, NewPlan, Plan, PlanTask};
use crate::ports::PlanRepository;

pub(crate) struct MockPlanRepository {
    pub plans: Mutex<Vec<Plan>>,
    pub fail_update: bool,
}

impl MockPlanRepository {
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(Vec::new()),
            fail_update: false,
        }
    }

    pub fn failing_update() -> Self {
        Self {
            fail_update: true,
            ..Self::new()
        }
    }

    /// Stores the default plan for `user` and returns it.
    pub fn seed(&self, user: &str) -> Plan {
        let mut plans = self.plans.lock().unwrap();
        let next_task = plans.iter().map(|p| p.tasks.len() as i64).sum::<i64>() + 1;
        let plan_id = PlanId::new(plans.len() as i64 + 1);
        let new = default_plan(UserId::new(user).unwrap());
        let task_ids: Vec<TaskId> = (0..new.tasks.len() as i64)
            .map(|i| TaskId::new(next_task + i))
            .collect();
        let plan = new.into_plan(plan_id, &task_ids, Timestamp::now());
        plans.push(plan.clone());
        plan
    }

    pub fn task(&self, id: TaskId) -> Option<PlanTask> {
        self.plans
            .lock()
            .unwrap()
            .iter()
            .flat_map(|p| p.tasks.iter())
            .find(|t| t.id == id)
            .cloned()
    }
}

#[async_trait]
impl PlanRepository for MockPlanRepository {
    async fn create(&self, plan: NewPlan) -> Result<Plan, DomainError> {
        let mut plans = self.plans.lock().unwrap();
        let next_task = plans.iter().map(|p| p.tasks.len() as i64).sum::<i64>() + 1;
        let task_ids: Vec<TaskId> = (0..plan.tasks.len() as i64)
            .map(|i| TaskId::new(next_task + i))
            .collect();
        let plan = plan.into_plan(PlanId::new(plans.len() as i64 + 1), &task_ids, Timestamp::now());
        plans.push(plan.clone());
        Ok(plan)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Plan>, DomainError> {
        let mut plans: Vec<Plan> = self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect();
        plans.reverse();
        Ok(plans)
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<PlanTask>, DomainError> {
        Ok(self.task(id))
    }

    async fn update_task(&self, task: &PlanTask) -> Result<PlanTask, DomainError> {
        if self.fail_update {
            return Err(DomainError::new(ErrorCode::DatabaseError, "simulated failure"));
        }
        let mut plans = self.plans.lock().unwrap();
        let slot = plans
            .iter_mut()
            .flat_map(|p| p.tasks.iter_mut())
            .find(|t| t.id == task.id)
            .ok_or_else(|| DomainError::new(ErrorCode::TaskNotFound, "missing"))?;
        *slot = task.clone();
        Ok(task.clone())
    }
}
