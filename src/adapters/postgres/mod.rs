//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAssessmentRepository` - Assessments with versioned updates
//! - `PostgresChatRepository` - Chat history
//! - `PostgresPlanRepository` - Plans and tasks
//!
//! The schema lives in `migrations/`.

mod assessment_repository;
mod chat_repository;
mod plan_repository;

pub use assessment_repository::PostgresAssessmentRepository;
pub use chat_repository::PostgresChatRepository;
pub use plan_repository::PostgresPlanRepository;

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Maps a sqlx failure to `DatabaseError` with `context` prefixed.
fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{context}: {e}"))
}

/// Reads one column, mapping decode failures to `DatabaseError`.
fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get {name}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_error_keeps_context() {
        let err = db_error("Failed to fetch plan")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to fetch plan: "));
    }
}
