//! In-memory adapters.
//!
//! Used when no database or Redis is configured, and by integration tests.
//! State lives for the lifetime of the process.

mod assessment_repository;
mod chat_repository;
mod plan_repository;
mod quota_repository;

pub use assessment_repository::InMemoryAssessmentRepository;
pub use chat_repository::InMemoryChatRepository;
pub use plan_repository::InMemoryPlanRepository;
pub use quota_repository::InMemoryQuotaRepository;
