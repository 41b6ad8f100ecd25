//! Guest chat quota.
//!
//! Guests (ids prefixed `guest_`) may send a limited number of messages;
//! registered users are unlimited.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, GUEST_PREFIX};

/// Remaining-quota value reported for users without a limit.
pub const UNLIMITED: i64 = -1;

/// Whether a caller is a guest or a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Guest,
    Registered,
}

impl UserType {
    /// A missing id or one with the guest prefix is a guest.
    pub fn of(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) if !id.trim().is_empty() && !id.starts_with(GUEST_PREFIX) => UserType::Registered,
            _ => UserType::Guest,
        }
    }
}

/// Messages a guest has sent so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestQuota {
    pub user_id: UserId,
    pub messages_sent: u32,
}

impl GuestQuota {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            messages_sent: 0,
        }
    }

    pub fn is_exhausted(&self, limit: u32) -> bool {
        self.messages_sent >= limit
    }

    /// Messages left before `limit`, never negative.
    pub fn remaining(&self, limit: u32) -> u32 {
        limit.saturating_sub(self.messages_sent)
    }
}
