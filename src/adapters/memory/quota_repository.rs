//! In-memory guest quota counters.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::quota::GuestQuota;
use crate::ports::QuotaRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryQuotaRepository {
    counts: Arc<RwLock<HashMap<UserId, u32>>>,
}

impl InMemoryQuotaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotaRepository for InMemoryQuotaRepository {
    async fn get(&self, user_id: &UserId) -> Result<GuestQuota, DomainError> {
        let sent = self.counts.read().await.get(user_id).copied().unwrap_or(0);
        Ok(GuestQuota {
            user_id: user_id.clone(),
            messages_sent: sent,
        })
    }

    async fn increment(&self, user_id: &UserId) -> Result<GuestQuota, DomainError> {
        let mut counts = self.counts.write().await;
        let sent = counts.entry(user_id.clone()).or_insert(0);
        *sent = sent.saturating_add(1);
        Ok(GuestQuota {
            user_id: user_id.clone(),
            messages_sent: *sent,
        })
    }
}
