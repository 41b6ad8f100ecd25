//! HTTP handlers for assessment endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::response::ApiResponse;
use crate::application::handlers::{
    GetResultHandler, GetResultQuery, StartOrContinueCommand, StartOrContinueHandler,
    SubmitAnswerCommand, SubmitAnswerHandler,
};
use crate::domain::foundation::{ErrorCode, UserId};

use super::dto::{AnswerRequest, AssessmentResponse, AssessmentStepResponse, StartRequest};

#[derive(Clone)]
pub struct AssessmentHandlers {
    start_handler: Arc<StartOrContinueHandler>,
    submit_handler: Arc<SubmitAnswerHandler>,
    result_handler: Arc<GetResultHandler>,
}

impl AssessmentHandlers {
    pub fn new(
        start_handler: Arc<StartOrContinueHandler>,
        submit_handler: Arc<SubmitAnswerHandler>,
        result_handler: Arc<GetResultHandler>,
    ) -> Self {
        Self {
            start_handler,
            submit_handler,
            result_handler,
        }
    }
}

/// POST /api/assessment/start - Start or resume the user's assessment
pub async fn start_assessment(
    State(handlers): State<AssessmentHandlers>,
    Json(req): Json<StartRequest>,
) -> Result<ApiResponse<AssessmentStepResponse>, ApiError> {
    let cmd = StartOrContinueCommand {
        user_id: UserId::new(req.user_id)?,
    };
    let step = handlers.start_handler.handle(cmd).await?;
    Ok(ApiResponse::ok("Assessment ready", step.into()))
}

/// POST /api/assessment/answer - Record an answer and fetch the next question
pub async fn submit_answer(
    State(handlers): State<AssessmentHandlers>,
    Json(req): Json<AnswerRequest>,
) -> Result<ApiResponse<AssessmentStepResponse>, ApiError> {
    let cmd = SubmitAnswerCommand {
        user_id: UserId::new(req.user_id)?,
        question_id: req.question_id,
        values: req.values.into_vec(),
    };
    let step = handlers.submit_handler.handle(cmd).await?;
    let message = if step.is_finished() {
        "Assessment completed"
    } else {
        "Answer recorded"
    };
    Ok(ApiResponse::ok(message, step.into()))
}

/// GET /api/assessment/result/:user_id - Latest completed assessment
pub async fn get_result(
    State(handlers): State<AssessmentHandlers>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<AssessmentResponse>, ApiError> {
    let user_id = UserId::new(user_id)?;
    let query = GetResultQuery {
        user_id: user_id.clone(),
    };
    match handlers.result_handler.handle(query).await? {
        Some(assessment) => Ok(ApiResponse::ok(
            "Assessment result retrieved",
            AssessmentResponse::from(&assessment),
        )),
        None => Err(ApiError::not_found(
            ErrorCode::AssessmentNotFound,
            format!("No completed assessment for user {user_id}"),
        )),
    }
}
