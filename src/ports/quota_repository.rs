//! Guest quota repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::quota::GuestQuota;

#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Current quota of a guest; an unknown guest has sent nothing.
    async fn get(&self, user_id: &UserId) -> Result<GuestQuota, DomainError>;

    /// Counts one more message, creating the record if needed.
    async fn increment(&self, user_id: &UserId) -> Result<GuestQuota, DomainError>;
}
