//! Error responses for the HTTP API.
//!
//! Every failure leaves the server as an [`ErrorResponse`] body; the status
//! follows the error's [`ErrorKind`]. Internal failures are logged here and
//! replaced with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::application::handlers::ChatError;
use crate::domain::assessment::AssessmentError;
use crate::domain::foundation::{DomainError, ErrorCode, ErrorKind, ValidationError};
use crate::domain::plan::PlanError;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// An error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    /// Builds the response for `kind`; internal messages never reach the client.
    pub fn new(kind: ErrorKind, code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let body = if kind == ErrorKind::Internal {
            error!(code = %code, error = %message, "request failed");
            ErrorResponse::new(ErrorCode::InternalError, INTERNAL_ERROR_MESSAGE)
        } else {
            warn!(code = %code, error = %message, "request rejected");
            ErrorResponse::new(code, message)
        };
        Self {
            status: status_for(kind),
            body,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, ErrorCode::ValidationFailed, message)
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        if self.status != StatusCode::INTERNAL_SERVER_ERROR {
            self.body = self.body.with_details(details);
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::new(err.kind(), err.code, err.message)
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        ApiError::new(err.kind(), err.code(), err.to_string())
    }
}

impl From<AssessmentError> for ApiError {
    fn from(err: AssessmentError) -> Self {
        let api = ApiError::new(err.kind(), err.code(), err.user_message());
        match err.question() {
            Some(question) => api.with_details(serde_json::json!({ "question": question })),
            None => api,
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError::new(err.kind(), err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlanId, TaskId};

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn plan_not_found_is_404_with_code() {
        let api: ApiError = PlanError::PlanNotFound(PlanId::new(7)).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.body.code, "PLAN_NOT_FOUND");
        assert!(api.body.message.contains('7'));
    }

    #[test]
    fn forbidden_task_is_403() {
        let api: ApiError = PlanError::Forbidden {
            task_id: TaskId::new(3),
        }
        .into();
        assert_eq!(api.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_details_are_hidden() {
        let api: ApiError = DomainError::new(ErrorCode::DatabaseError, "password=hunter2").into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.code, "INTERNAL_ERROR");
        assert_eq!(api.body.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn quota_exhaustion_is_403() {
        let api: ApiError = ChatError::QuotaExceeded { limit: 10 }.into();
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.body.code, "QUOTA_EXCEEDED");
    }

    #[test]
    fn conflicts_are_409() {
        let api: ApiError = DomainError::new(ErrorCode::ConcurrencyConflict, "stale").into();
        assert_eq!(api.status, StatusCode::CONFLICT);
    }
}
