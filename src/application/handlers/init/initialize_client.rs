//! InitializeClientHandler - Identifies the caller and returns the client setup.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::foundation::{UserId, ValidationError, GUEST_PREFIX};
use crate::domain::persona::{Persona, PersonaGroup};
use crate::domain::quota::{UserType, UNLIMITED};
use crate::ports::{PersonaDirectory, QuotaRepository};

/// Query for the client setup. A missing id starts a new guest session.
#[derive(Debug, Clone, Default)]
pub struct InitializeClientQuery {
    pub user_id: Option<String>,
}

/// Everything a client needs before its first message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientProfile {
    pub user_type: UserType,
    pub user_id: UserId,
    pub guest_chat_quota: u32,
    pub messages_sent: u32,
    /// Messages a guest may still send; `-1` for registered users.
    pub remaining_quota: i64,
    /// Model name to provider name.
    pub models: BTreeMap<String, String>,
    pub groups: Vec<PersonaGroup>,
    pub characters: Vec<Persona>,
}

pub struct InitializeClientHandler {
    quotas: Arc<dyn QuotaRepository>,
    personas: Arc<dyn PersonaDirectory>,
    models: BTreeMap<String, String>,
    guest_quota: u32,
}

impl InitializeClientHandler {
    pub fn new(
        quotas: Arc<dyn QuotaRepository>,
        personas: Arc<dyn PersonaDirectory>,
        models: BTreeMap<String, String>,
        guest_quota: u32,
    ) -> Self {
        Self {
            quotas,
            personas,
            models,
            guest_quota,
        }
    }

    pub async fn handle(&self, query: InitializeClientQuery) -> Result<ClientProfile, ValidationError> {
        let requested = query.user_id.filter(|id| !id.trim().is_empty());
        let user_type = UserType::of(requested.as_deref());

        let (user_id, messages_sent, remaining_quota) = match user_type {
            UserType::Guest => {
                let user_id = match requested {
                    Some(id) => UserId::new(id)?,
                    None => {
                        let id = UserId::new(format!("{GUEST_PREFIX}{}", Uuid::new_v4()))?;
                        info!(user_id = %id, "new guest session");
                        id
                    }
                };
                let sent = match self.quotas.get(&user_id).await {
                    Ok(quota) => quota.messages_sent,
                    Err(err) => {
                        warn!(user_id = %user_id, error = %err, "could not load guest quota; assuming none used");
                        0
                    }
                };
                let remaining = i64::from(self.guest_quota.saturating_sub(sent));
                (user_id, sent, remaining)
            }
            UserType::Registered => {
                let id = requested.unwrap_or_default();
                (UserId::new(id)?, 0, UNLIMITED)
            }
        };

        Ok(ClientProfile {
            user_type,
            user_id,
            guest_chat_quota: self.guest_quota,
            messages_sent,
            remaining_quota,
            models: self.models.clone(),
            groups: self.personas.groups(),
            characters: self.personas.personas(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::foundation::{DomainError, ErrorCode, PersonaId};
    use crate::domain::quota::GuestQuota;
    use crate::ports::GroupRoster;

    struct MockQuotas {
        sent: Mutex<BTreeMap<String, u32>>,
        fail: bool,
    }

    impl MockQuotas {
        fn with(user: &str, sent: u32) -> Self {
            Self {
                sent: Mutex::new(BTreeMap::from([(user.to_string(), sent)])),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl QuotaRepository for MockQuotas {
        async fn get(&self, user_id: &UserId) -> Result<GuestQuota, DomainError> {
            if self.fail {
                return Err(DomainError::new(ErrorCode::CacheError, "down"));
            }
            let sent = self.sent.lock().unwrap().get(user_id.as_str()).copied().unwrap_or(0);
            Ok(GuestQuota {
                user_id: user_id.clone(),
                messages_sent: sent,
            })
        }

        async fn increment(&self, user_id: &UserId) -> Result<GuestQuota, DomainError> {
            let mut sent = self.sent.lock().unwrap();
            let count = sent.entry(user_id.as_str().to_string()).or_insert(0);
            *count += 1;
            Ok(GuestQuota {
                user_id: user_id.clone(),
                messages_sent: *count,
            })
        }
    }

    struct StaticDirectory;

    impl PersonaDirectory for StaticDirectory {
        fn personas(&self) -> Vec<Persona> {
            vec![Persona {
                id: PersonaId::new("coach").unwrap(),
                name: "Coach".into(),
                personality: String::new(),
                model: "qwen-plus".into(),
                avatar: String::new(),
                custom_prompt: String::new(),
                tags: vec![],
            }]
        }

        fn groups(&self) -> Vec<PersonaGroup> {
            vec![PersonaGroup {
                id: "g1".into(),
                name: "Health".into(),
                description: String::new(),
                members: vec![PersonaId::new("coach").unwrap()],
                is_group_discussion_mode: false,
            }]
        }

        fn find(&self, id: &PersonaId) -> Option<Persona> {
            self.personas().into_iter().find(|p| &p.id == id)
        }

        fn roster(&self, _group_id: Option<&str>) -> Option<GroupRoster> {
            None
        }
    }

    fn handler(quotas: MockQuotas) -> InitializeClientHandler {
        InitializeClientHandler::new(
            Arc::new(quotas),
            Arc::new(StaticDirectory),
            BTreeMap::from([("qwen-plus".to_string(), "dashscope".to_string())]),
            10,
        )
    }

    #[tokio::test]
    async fn missing_id_creates_new_guest() {
        let profile = handler(MockQuotas::with("x", 0))
            .handle(InitializeClientQuery::default())
            .await
            .unwrap();

        assert_eq!(profile.user_type, UserType::Guest);
        assert!(profile.user_id.is_guest());
        assert_eq!(profile.remaining_quota, 10);
        assert_eq!(profile.models.get("qwen-plus").map(String::as_str), Some("dashscope"));
        assert_eq!(profile.groups.len(), 1);
        assert_eq!(profile.characters.len(), 1);
    }

    #[tokio::test]
    async fn known_guest_reports_usage() {
        let profile = handler(MockQuotas::with("guest_abc", 4))
            .handle(InitializeClientQuery {
                user_id: Some("guest_abc".into()),
            })
            .await
            .unwrap();

        assert_eq!(profile.user_id.as_str(), "guest_abc");
        assert_eq!(profile.messages_sent, 4);
        assert_eq!(profile.remaining_quota, 6);
    }

    #[tokio::test]
    async fn remaining_quota_never_negative() {
        let profile = handler(MockQuotas::with("guest_abc", 14))
            .handle(InitializeClientQuery {
                user_id: Some("guest_abc".into()),
            })
            .await
            .unwrap();

        assert_eq!(profile.remaining_quota, 0);
    }

    #[tokio::test]
    async fn registered_user_is_unlimited() {
        let profile = handler(MockQuotas::with("alice", 99))
            .handle(InitializeClientQuery {
                user_id: Some("alice".into()),
            })
            .await
            .unwrap();

        assert_eq!(profile.user_type, UserType::Registered);
        assert_eq!(profile.messages_sent, 0);
        assert_eq!(profile.remaining_quota, UNLIMITED);
    }

    #[tokio::test]
    async fn quota_store_failure_assumes_nothing_sent() {
        let quotas = MockQuotas {
            fail: true,
            ..MockQuotas::with("guest_abc", 3)
        };

        let profile = handler(quotas)
            .handle(InitializeClientQuery {
                user_id: Some("guest_abc".into()),
            })
            .await
            .unwrap();

        assert_eq!(profile.messages_sent, 0);
        assert_eq!(profile.remaining_quota, 10);
    }
}
