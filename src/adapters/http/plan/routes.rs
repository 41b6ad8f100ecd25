//! HTTP routes for plan endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    complete_task, generate_plan, get_active_plan, get_plan_details, list_user_plans, skip_task,
    PlanHandlers,
};

/// Creates the plan router with all endpoints.
pub fn plan_routes(handlers: PlanHandlers) -> Router {
    Router::new()
        .route("/generate", post(generate_plan))
        .route("/user/:user_id", get(list_user_plans))
        .route("/user/:user_id/active", get(get_active_plan))
        .route("/task/:task_id/complete", post(complete_task))
        .route("/task/:task_id/skip", post(skip_task))
        .route("/:plan_id", get(get_plan_details))
        .with_state(handlers)
}
