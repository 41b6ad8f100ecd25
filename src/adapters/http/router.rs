//! Assembles the feature routers under `/api` and applies the shared layers.

use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::ServerConfig;

use super::assessment::{assessment_routes, AssessmentHandlers};
use super::chat::{chat_routes, ChatHandlers};
use super::init::{init_routes, InitHandlers};
use super::plan::{plan_routes, PlanHandlers};
use super::progress::{progress_routes, ProgressHandlers};

/// Handler state of every feature router.
#[derive(Clone)]
pub struct AppHandlers {
    pub init: InitHandlers,
    pub chat: ChatHandlers,
    pub assessment: AssessmentHandlers,
    pub plan: PlanHandlers,
    pub progress: ProgressHandlers,
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Builds the application router.
///
/// The chat stream is exempt from the request timeout; a reply may take
/// longer than any ordinary request.
pub fn api_router(handlers: AppHandlers, server: &ServerConfig) -> Router {
    let bounded = Router::new()
        .nest("/init", init_routes(handlers.init))
        .nest("/assessment", assessment_routes(handlers.assessment))
        .nest("/plan", plan_routes(handlers.plan))
        .nest("/progress", progress_routes(handlers.progress))
        .layer(TimeoutLayer::new(server.request_timeout()));

    let api = bounded.nest("/chat", chat_routes(handlers.chat));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(cors_layer(server))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
