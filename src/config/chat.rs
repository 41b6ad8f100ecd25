//! Chat flow limits

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::handlers::chat::{
    ChatSettings, DEFAULT_GUEST_QUOTA, DEFAULT_HISTORY_LIMIT,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Messages a guest may send before registering
    #[serde(default = "default_guest_quota")]
    pub guest_quota: u32,

    /// Prior messages included in each persona prompt
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl ChatConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.guest_quota == 0 {
            return Err(ValidationError::InvalidGuestQuota);
        }
        if self.history_limit == 0 {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        Ok(())
    }

    pub fn settings(&self, system_prompt: impl Into<String>) -> ChatSettings {
        ChatSettings {
            guest_quota: self.guest_quota,
            history_limit: self.history_limit,
            system_prompt: system_prompt.into(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            guest_quota: default_guest_quota(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_guest_quota() -> u32 {
    DEFAULT_GUEST_QUOTA
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_into_settings() {
        let settings = ChatConfig::default().settings("Welcome to #groupName#");
        assert_eq!(settings.guest_quota, 10);
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.system_prompt, "Welcome to #groupName#");
    }

    #[test]
    fn zero_limits_are_rejected() {
        let cfg = ChatConfig {
            guest_quota: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ValidationError::InvalidGuestQuota));

        let cfg = ChatConfig {
            history_limit: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ValidationError::InvalidHistoryLimit));
    }
}
