//! Client initialisation handlers.

mod initialize_client;

pub use initialize_client::{ClientProfile, InitializeClientHandler, InitializeClientQuery};
