//! HTTP routes for assessment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_result, start_assessment, submit_answer, AssessmentHandlers};

/// Creates the assessment router with all endpoints.
pub fn assessment_routes(handlers: AssessmentHandlers) -> Router {
    Router::new()
        .route("/start", post(start_assessment))
        .route("/answer", post(submit_answer))
        .route("/result/:user_id", get(get_result))
        .with_state(handlers)
}
