//! HTTP adapter for the profile assessment endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{AnswerRequest, AssessmentResponse, AssessmentStepResponse, StartRequest};
pub use handlers::AssessmentHandlers;
pub use routes::assessment_routes;
