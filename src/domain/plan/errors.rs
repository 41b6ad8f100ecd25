//! Plan errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ErrorKind, PlanId, TaskId, ValidationError};

#[derive(Debug, Clone, Error)]
pub enum PlanError {
    #[error("plan with ID {0} not found")]
    PlanNotFound(PlanId),

    #[error("task with ID {0} not found")]
    TaskNotFound(TaskId),

    #[error("plan associated with task {task_id} not found")]
    OrphanTask { task_id: TaskId },

    #[error("unauthorized to modify task {task_id}")]
    Forbidden { task_id: TaskId },

    #[error("cannot skip an already completed task")]
    AlreadyCompleted { task_id: TaskId },

    #[error("invalid user: {0}")]
    InvalidUser(#[from] ValidationError),

    #[error("plan store error: {0}")]
    Repository(#[from] DomainError),
}

impl PlanError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlanError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            PlanError::TaskNotFound(_) => ErrorCode::TaskNotFound,
            PlanError::OrphanTask { .. } => ErrorCode::InternalError,
            PlanError::Forbidden { .. } => ErrorCode::Forbidden,
            PlanError::AlreadyCompleted { .. } => ErrorCode::InvalidStateTransition,
            PlanError::InvalidUser(_) => ErrorCode::ValidationFailed,
            PlanError::Repository(source) => source.code,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_codes() {
        assert_eq!(PlanError::PlanNotFound(PlanId::new(1)).kind(), ErrorKind::NotFound);
        assert_eq!(
            PlanError::Forbidden { task_id: TaskId::new(1) }.kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            PlanError::AlreadyCompleted { task_id: TaskId::new(1) }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            PlanError::Repository(DomainError::new(ErrorCode::DatabaseError, "down")).kind(),
            ErrorKind::Internal
        );
    }
}
