//! Assessment repository port.
//!
//! The store owns the canonical copy of every assessment. Reads hand out
//! owned copies; changes flow back only through `update`.
//!
//! # Concurrency
//!
//! `update` is a compare-and-swap on `Assessment::version`: a caller
//! holding a stale copy gets `ConcurrencyConflict` instead of silently
//! overwriting a newer record.

use async_trait::async_trait;

use crate::domain::assessment::{Assessment, AssessmentStatus, NewAssessment};
use crate::domain::foundation::{AssessmentId, DomainError, UserId};

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Stores a new in-progress assessment and returns it with its id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, assessment: NewAssessment) -> Result<Assessment, DomainError>;

    /// Returns `None` if no assessment has this id.
    async fn find_by_id(&self, id: AssessmentId) -> Result<Option<Assessment>, DomainError>;

    /// Most recently updated assessment of a user, optionally filtered by status.
    ///
    /// Returns `None` when nothing matches.
    async fn find_latest_by_user(
        &self,
        user_id: &UserId,
        status: Option<AssessmentStatus>,
    ) -> Result<Option<Assessment>, DomainError>;

    /// Persists the caller's copy and returns the stored record.
    ///
    /// `user_id`, `started_at` and `created_at` are taken from the stored
    /// record whatever the caller supplies; `updated_at` is refreshed and
    /// `version` incremented.
    ///
    /// # Errors
    ///
    /// - `AssessmentNotFound` if the assessment does not exist
    /// - `ConcurrencyConflict` if the stored version differs from the caller's
    /// - `DatabaseError` on persistence failure
    async fn update(&self, assessment: &Assessment) -> Result<Assessment, DomainError>;
}
