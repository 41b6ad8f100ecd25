//! HTTP adapter for client initialisation.

mod handlers;

pub use handlers::{init_routes, InitHandlers, InitParams};
