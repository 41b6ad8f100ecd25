//! Redis adapters for state shared between server instances.

mod quota_repository;

pub use quota_repository::{quota_key, RedisQuotaRepository};
