//! PostgreSQL implementation of AssessmentRepository.
//!
//! Answers are stored as a JSONB array. Updates are a compare-and-swap on
//! the `version` column.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{column, db_error};
use crate::domain::assessment::{Answer, Assessment, AssessmentStatus, NewAssessment};
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AssessmentRepository;

const COLUMNS: &str = "id, user_id, status, current_question_id, answers, started_at, \
                       completed_at, created_at, updated_at, version";

#[derive(Clone)]
pub struct PostgresAssessmentRepository {
    pool: PgPool,
}

impl PostgresAssessmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentRepository for PostgresAssessmentRepository {
    async fn create(&self, new: NewAssessment) -> Result<Assessment, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO assessments (user_id, status, answers, started_at, created_at, updated_at, version)
            VALUES ($1, $2, '[]'::jsonb, $3, $3, $3, 0)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.user_id.as_str())
        .bind(AssessmentStatus::InProgress.as_str())
        .bind(new.started_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to insert assessment"))?;

        row_to_assessment(&row)
    }

    async fn find_by_id(&self, id: AssessmentId) -> Result<Option<Assessment>, DomainError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM assessments WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch assessment"))?;

        row.as_ref().map(row_to_assessment).transpose()
    }

    async fn find_latest_by_user(
        &self,
        user_id: &UserId,
        status: Option<AssessmentStatus>,
    ) -> Result<Option<Assessment>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS} FROM assessments
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY updated_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id.as_str())
        .bind(status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch latest assessment"))?;

        row.as_ref().map(row_to_assessment).transpose()
    }

    async fn update(&self, assessment: &Assessment) -> Result<Assessment, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE assessments SET
                status = $2,
                current_question_id = $3,
                answers = $4,
                completed_at = $5,
                updated_at = $6,
                version = version + 1
            WHERE id = $1 AND version = $7
            RETURNING {COLUMNS}
            "#
        ))
        .bind(assessment.id().as_i64())
        .bind(assessment.status().as_str())
        .bind(assessment.current_question_id())
        .bind(Json(assessment.answers()))
        .bind(assessment.completed_at().map(|t| *t.as_datetime()))
        .bind(Timestamp::now().as_datetime())
        .bind(assessment.version())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update assessment"))?;

        if let Some(row) = row {
            return row_to_assessment(&row);
        }

        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM assessments WHERE id = $1)")
            .bind(assessment.id().as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check assessment existence"))?;

        Err(if exists.0 {
            DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("assessment {} was modified concurrently", assessment.id()),
            )
        } else {
            DomainError::new(
                ErrorCode::AssessmentNotFound,
                format!("assessment {} not found", assessment.id()),
            )
        })
    }
}

fn row_to_assessment(row: &sqlx::postgres::PgRow) -> Result<Assessment, DomainError> {
    let status: String = column(row, "status")?;
    let status = status
        .parse::<AssessmentStatus>()
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid assessment status: {e}")))?;
    let user_id: String = column(row, "user_id")?;
    let Json(answers): Json<Vec<Answer>> = column(row, "answers")?;

    Ok(Assessment::reconstitute(
        AssessmentId::new(column(row, "id")?),
        UserId::new(user_id)
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {e}")))?,
        status,
        column(row, "current_question_id")?,
        answers,
        Timestamp::from_datetime(column(row, "started_at")?),
        column::<Option<chrono::DateTime<chrono::Utc>>>(row, "completed_at")?
            .map(Timestamp::from_datetime),
        Timestamp::from_datetime(column(row, "created_at")?),
        Timestamp::from_datetime(column(row, "updated_at")?),
        column(row, "version")?,
    ))
}
