//! Redis-backed guest quota counters.
//!
//! Each guest has one integer key, `guest_quota:<user id>`, bumped with
//! `INCR`. Counters never expire; a guest's allowance is for life.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::quota::GuestQuota;
use crate::ports::QuotaRepository;

const KEY_PREFIX: &str = "guest_quota:";

/// Key holding the counter for `user_id`.
pub fn quota_key(user_id: &UserId) -> String {
    format!("{KEY_PREFIX}{user_id}")
}

#[derive(Clone)]
pub struct RedisQuotaRepository {
    conn: MultiplexedConnection,
}

impl RedisQuotaRepository {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(cache_error)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(cache_error)?;
        Ok(Self::new(conn))
    }
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("redis: {e}"))
}

/// Counters are stored as signed integers; clamp anything odd to `u32`.
fn to_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

#[async_trait]
impl QuotaRepository for RedisQuotaRepository {
    async fn get(&self, user_id: &UserId) -> Result<GuestQuota, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<i64> = conn.get(quota_key(user_id)).await.map_err(cache_error)?;
        Ok(GuestQuota {
            user_id: user_id.clone(),
            messages_sent: to_count(raw.unwrap_or(0)),
        })
    }

    async fn increment(&self, user_id: &UserId) -> Result<GuestQuota, DomainError> {
        let mut conn = self.conn.clone();
        let raw: i64 = conn
            .incr(quota_key(user_id), 1_i64)
            .await
            .map_err(cache_error)?;
        Ok(GuestQuota {
            user_id: user_id.clone(),
            messages_sent: to_count(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefixed_user_id() {
        let guest = UserId::new("guest_42").unwrap();
        assert_eq!(quota_key(&guest), "guest_quota:guest_42");
    }

    #[test]
    fn stored_counts_are_clamped() {
        assert_eq!(to_count(3), 3);
        assert_eq!(to_count(-5), 0);
        assert_eq!(to_count(i64::MAX), u32::MAX);
    }

    #[test]
    fn redis_errors_map_to_cache_errors() {
        let err = cache_error(redis::RedisError::from((redis::ErrorKind::IoError, "refused")));
        assert_eq!(err.code, ErrorCode::CacheError);
    }
}
