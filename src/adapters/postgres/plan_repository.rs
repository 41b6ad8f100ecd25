//! PostgreSQL implementation of PlanRepository.
//!
//! A plan and its tasks are written in one transaction.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, db_error};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, TaskId, Timestamp, UserId};
use crate::domain::plan::{NewPlan, Plan, PlanStatus, PlanTask, TaskStatus, TaskType};
use crate::ports::PlanRepository;

const PLAN_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at, completed_at";
const TASK_COLUMNS: &str = "id, plan_id, task_type, title, description, frequency, duration, \
                            status, completed_at, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn tasks_for(&self, plan_ids: &[i64]) -> Result<Vec<PlanTask>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM plan_tasks WHERE plan_id = ANY($1) ORDER BY plan_id, sort_order"
        ))
        .bind(plan_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch plan tasks"))?;

        rows.iter().map(row_to_task).collect()
    }

    async fn assemble(&self, rows: Vec<PgRow>) -> Result<Vec<Plan>, DomainError> {
        let mut plans: Vec<Plan> = rows.iter().map(row_to_plan).collect::<Result<_, _>>()?;
        let ids: Vec<i64> = plans.iter().map(|p| p.id.as_i64()).collect();
        for task in self.tasks_for(&ids).await? {
            if let Some(plan) = plans.iter_mut().find(|p| p.id == task.plan_id) {
                plan.tasks.push(task);
            }
        }
        Ok(plans)
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn create(&self, plan: NewPlan) -> Result<Plan, DomainError> {
        let now = Timestamp::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (plan_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO plans (user_id, title, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(plan.user_id.as_str())
        .bind(&plan.title)
        .bind(&plan.description)
        .bind(plan.status.as_str())
        .bind(now.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to insert plan"))?;

        let mut task_ids = Vec::with_capacity(plan.tasks.len());
        for task in &plan.tasks {
            let (task_id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO plan_tasks (
                    plan_id, task_type, title, description, frequency, duration,
                    status, sort_order, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
                RETURNING id
                "#,
            )
            .bind(plan_id)
            .bind(task.task_type.as_str())
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.frequency)
            .bind(&task.duration)
            .bind(TaskStatus::Pending.as_str())
            .bind(task.order)
            .bind(now.as_datetime())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to insert plan task"))?;
            task_ids.push(TaskId::new(task_id));
        }

        tx.commit().await.map_err(db_error("Failed to commit plan"))?;

        let mut stored = plan.into_plan(PlanId::new(plan_id), &task_ids, now);
        stored.tasks.sort_by_key(|t| t.order);
        Ok(stored)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch plan"))?;

        Ok(self.assemble(rows).await?.into_iter().next())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Plan>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch plans by user"))?;

        self.assemble(rows).await
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<PlanTask>, DomainError> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM plan_tasks WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch task"))?;

        row.as_ref().map(row_to_task).transpose()
    }

    async fn update_task(&self, task: &PlanTask) -> Result<PlanTask, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE plan_tasks SET status = $2, completed_at = $3, updated_at = $4
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id.as_i64())
        .bind(task.status.as_str())
        .bind(task.completed_at.map(|t| *t.as_datetime()))
        .bind(Timestamp::now().as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update task"))?;

        match row {
            Some(row) => row_to_task(&row),
            None => Err(DomainError::new(
                ErrorCode::TaskNotFound,
                format!("task with ID {} not found", task.id),
            )),
        }
    }
}

fn parse_column<T: std::str::FromStr>(row: &PgRow, name: &str) -> Result<T, DomainError>
where
    T::Err: std::fmt::Display,
{
    let raw: String = column(row, name)?;
    raw.parse::<T>()
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid {name}: {e}")))
}

fn optional_time(row: &PgRow, name: &str) -> Result<Option<Timestamp>, DomainError> {
    Ok(column::<Option<chrono::DateTime<chrono::Utc>>>(row, name)?.map(Timestamp::from_datetime))
}

fn row_to_plan(row: &PgRow) -> Result<Plan, DomainError> {
    let user_id: String = column(row, "user_id")?;
    Ok(Plan {
        id: PlanId::new(column(row, "id")?),
        user_id: UserId::new(user_id)
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {e}")))?,
        title: column(row, "title")?,
        description: column(row, "description")?,
        status: parse_column::<PlanStatus>(row, "status")?,
        tasks: Vec::new(),
        created_at: Timestamp::from_datetime(column(row, "created_at")?),
        updated_at: Timestamp::from_datetime(column(row, "updated_at")?),
        completed_at: optional_time(row, "completed_at")?,
    })
}

fn row_to_task(row: &PgRow) -> Result<PlanTask, DomainError> {
    Ok(PlanTask {
        id: TaskId::new(column(row, "id")?),
        plan_id: PlanId::new(column(row, "plan_id")?),
        task_type: parse_column::<TaskType>(row, "task_type")?,
        title: column(row, "title")?,
        description: column(row, "description")?,
        frequency: column(row, "frequency")?,
        duration: column(row, "duration")?,
        status: parse_column::<TaskStatus>(row, "status")?,
        completed_at: optional_time(row, "completed_at")?,
        order: column(row, "sort_order")?,
        created_at: Timestamp::from_datetime(column(row, "created_at")?),
        updated_at: Timestamp::from_datetime(column(row, "updated_at")?),
    })
}
