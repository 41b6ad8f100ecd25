//! HTTP adapter for plan endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{PlanResponse, TaskResponse, UserRequest};
pub use handlers::PlanHandlers;
pub use routes::plan_routes;
