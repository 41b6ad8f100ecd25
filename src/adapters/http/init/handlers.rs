//! GET /api/init - identifies the caller and returns the client setup.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::response::ApiResponse;
use crate::application::handlers::{ClientProfile, InitializeClientHandler, InitializeClientQuery};

#[derive(Clone)]
pub struct InitHandlers {
    init_handler: Arc<InitializeClientHandler>,
}

impl InitHandlers {
    pub fn new(init_handler: Arc<InitializeClientHandler>) -> Self {
        Self { init_handler }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitParams {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

pub async fn initialize_client(
    State(handlers): State<InitHandlers>,
    Query(params): Query<InitParams>,
) -> Result<ApiResponse<ClientProfile>, ApiError> {
    let query = InitializeClientQuery {
        user_id: params.user_id,
    };
    let profile = handlers.init_handler.handle(query).await?;
    Ok(ApiResponse::ok("Success", profile))
}

pub fn init_routes(handlers: InitHandlers) -> Router {
    Router::new()
        .route("/", get(initialize_client))
        .with_state(handlers)
}
