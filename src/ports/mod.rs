//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `AssessmentRepository` - Assessment records with optimistic versioning
//! - `ChatRepository` - Per-user conversation history
//! - `PlanRepository` - Plans and their tasks
//! - `QuotaRepository` - Guest message counters
//!
//! ## AI Ports
//!
//! - `AIProvider` - Chat completions, streaming or not
//! - `TagClassifier` - Maps a message onto persona tags
//!
//! ## Configuration Ports
//!
//! - `PersonaDirectory` - Configured personas and groups

mod ai_provider;
mod assessment_repository;
mod chat_repository;
mod persona_directory;
mod plan_repository;
mod quota_repository;
mod tag_classifier;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    Message, MessageRole, RequestMetadata, StreamChunk, TokenUsage,
};
pub use assessment_repository::AssessmentRepository;
pub use chat_repository::ChatRepository;
pub use persona_directory::{GroupRoster, PersonaDirectory};
pub use plan_repository::PlanRepository;
pub use quota_repository::QuotaRepository;
pub use tag_classifier::TagClassifier;
