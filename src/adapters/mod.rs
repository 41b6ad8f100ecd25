//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Model providers, the model router and the tag classifier
//! - `http` - axum REST and SSE surface
//! - `memory` - In-process stores for development and tests
//! - `personas` - Persona directory built from configuration
//! - `postgres` - PostgreSQL stores
//! - `redis` - Redis guest quota counters

pub mod ai;
pub mod http;
pub mod memory;
pub mod personas;
pub mod postgres;
pub mod redis;
