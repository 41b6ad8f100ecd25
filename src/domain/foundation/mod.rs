//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types that form the
//! vocabulary of the coaching domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use ids::{AssessmentId, MessageId, PersonaId, PlanId, TaskId, UserId, GUEST_PREFIX};
pub use timestamp::Timestamp;
