//! HTTP routes for progress endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_report, ProgressHandlers};

pub fn progress_routes(handlers: ProgressHandlers) -> Router {
    Router::new()
        .route("/report/:user_id", get(get_report))
        .with_state(handlers)
}
