//! Domain layer containing business rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors)
//! - `assessment` - Health profile questionnaire: catalog, aggregate, engine errors
//! - `persona` - Configured responders and responder scoring
//! - `chat` - Conversation history records
//! - `plan` - Habit plans and their tasks
//! - `progress` - Adherence reports over plans
//! - `quota` - Guest message quota

pub mod assessment;
pub mod chat;
pub mod foundation;
pub mod persona;
pub mod plan;
pub mod progress;
pub mod quota;
