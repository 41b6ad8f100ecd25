//! HTTP adapter for progress reports.

mod handlers;
mod routes;

pub use handlers::{ProgressHandlers, ReportParams};
pub use routes::progress_routes;
