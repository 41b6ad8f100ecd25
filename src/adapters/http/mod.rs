//! HTTP adapters - REST API over the application handlers.
//!
//! Each feature has its own module with handler state and routes;
//! [`api_router`] mounts them under `/api`.
//!
//! Successful responses use the [`ApiResponse`] envelope, failures an
//! [`ErrorResponse`] with a status derived from the error kind.

pub mod assessment;
pub mod chat;
mod error;
pub mod init;
mod params;
pub mod plan;
pub mod progress;
mod response;
mod router;

pub use assessment::AssessmentHandlers;
pub use chat::ChatHandlers;
pub use error::{status_for, ApiError, ErrorResponse, INTERNAL_ERROR_MESSAGE};
pub use init::InitHandlers;
pub use plan::PlanHandlers;
pub use progress::ProgressHandlers;
pub use response::ApiResponse;
pub use router::{api_router, AppHandlers};
