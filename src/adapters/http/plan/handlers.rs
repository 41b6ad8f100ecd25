//! HTTP handlers for plan endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::params::parse_id;
use crate::adapters::http::response::ApiResponse;
use crate::application::handlers::{
    CompleteTaskCommand, CompleteTaskHandler, GeneratePlanCommand, GeneratePlanHandler,
    GetActivePlanHandler, GetActivePlanQuery, GetPlanDetailsHandler, GetPlanDetailsQuery,
    ListUserPlansHandler, ListUserPlansQuery, SkipTaskCommand, SkipTaskHandler,
};
use crate::domain::foundation::{ErrorCode, PlanId, TaskId, UserId};

use super::dto::{PlanResponse, TaskResponse, UserRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PlanHandlers {
    generate_handler: Arc<GeneratePlanHandler>,
    list_handler: Arc<ListUserPlansHandler>,
    active_handler: Arc<GetActivePlanHandler>,
    details_handler: Arc<GetPlanDetailsHandler>,
    complete_handler: Arc<CompleteTaskHandler>,
    skip_handler: Arc<SkipTaskHandler>,
}

impl PlanHandlers {
    pub fn new(
        generate_handler: Arc<GeneratePlanHandler>,
        list_handler: Arc<ListUserPlansHandler>,
        active_handler: Arc<GetActivePlanHandler>,
        details_handler: Arc<GetPlanDetailsHandler>,
        complete_handler: Arc<CompleteTaskHandler>,
        skip_handler: Arc<SkipTaskHandler>,
    ) -> Self {
        Self {
            generate_handler,
            list_handler,
            active_handler,
            details_handler,
            complete_handler,
            skip_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/plan/generate - Create a plan from the default template
pub async fn generate_plan(
    State(handlers): State<PlanHandlers>,
    Json(req): Json<UserRequest>,
) -> Result<ApiResponse<PlanResponse>, ApiError> {
    let cmd = GeneratePlanCommand {
        user_id: UserId::new(req.user_id)?,
    };
    let plan = handlers.generate_handler.handle(cmd).await?;
    Ok(ApiResponse::ok("Plan generated", plan.into()))
}

/// GET /api/plan/user/:user_id - All plans of a user, newest first
pub async fn list_user_plans(
    State(handlers): State<PlanHandlers>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<PlanResponse>>, ApiError> {
    let query = ListUserPlansQuery {
        user_id: UserId::new(user_id)?,
    };
    let plans = handlers.list_handler.handle(query).await?;
    Ok(ApiResponse::ok(
        "Plans retrieved",
        plans.into_iter().map(Into::into).collect(),
    ))
}

/// GET /api/plan/user/:user_id/active - The user's active plan
pub async fn get_active_plan(
    State(handlers): State<PlanHandlers>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<PlanResponse>, ApiError> {
    let user_id = UserId::new(user_id)?;
    let query = GetActivePlanQuery {
        user_id: user_id.clone(),
    };
    match handlers.active_handler.handle(query).await? {
        Some(plan) => Ok(ApiResponse::ok("Active plan retrieved", plan.into())),
        None => Err(ApiError::not_found(
            ErrorCode::PlanNotFound,
            format!("No active plan for user {user_id}"),
        )),
    }
}

/// GET /api/plan/:plan_id - A plan with its tasks
pub async fn get_plan_details(
    State(handlers): State<PlanHandlers>,
    Path(plan_id): Path<String>,
) -> Result<ApiResponse<PlanResponse>, ApiError> {
    let query = GetPlanDetailsQuery {
        plan_id: parse_id::<PlanId>(&plan_id, "plan id")?,
    };
    let plan = handlers.details_handler.handle(query).await?;
    Ok(ApiResponse::ok("Plan retrieved", plan.into()))
}

/// POST /api/plan/task/:task_id/complete
pub async fn complete_task(
    State(handlers): State<PlanHandlers>,
    Path(task_id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<ApiResponse<TaskResponse>, ApiError> {
    let cmd = CompleteTaskCommand {
        task_id: parse_id::<TaskId>(&task_id, "task id")?,
        user_id: UserId::new(req.user_id)?,
    };
    let task = handlers.complete_handler.handle(cmd).await?;
    Ok(ApiResponse::ok("Task completed", task.into()))
}

/// POST /api/plan/task/:task_id/skip
pub async fn skip_task(
    State(handlers): State<PlanHandlers>,
    Path(task_id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<ApiResponse<TaskResponse>, ApiError> {
    let cmd = SkipTaskCommand {
        task_id: parse_id::<TaskId>(&task_id, "task id")?,
        user_id: UserId::new(req.user_id)?,
    };
    let task = handlers.skip_handler.handle(cmd).await?;
    Ok(ApiResponse::ok("Task skipped", task.into()))
}
