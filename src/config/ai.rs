//! AI provider configuration
//!
//! Providers are named endpoints; `models` maps each model name a persona
//! may use to the provider that serves it.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    /// Provider name to endpoint settings
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,

    /// Model name to provider name
    #[serde(default)]
    pub models: BTreeMap<String, String>,

    /// Provider used for requests that name no model; the first provider when unset
    pub default_provider: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Kind of backend behind a provider name
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Any `/chat/completions` compatible API
    #[default]
    OpenAI,
    /// Canned replies, for local development
    Mock,
}

/// One provider endpoint
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub api_key: Option<Secret<String>>,

    /// Model used when a request names none
    pub default_model: Option<String>,
}

impl ProviderConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }

    fn validate(&self, name: &str) -> Result<(), ValidationError> {
        if self.kind == ProviderKind::Mock {
            return Ok(());
        }
        if self.api_key().is_none() {
            return Err(ValidationError::MissingApiKey(name.to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidProviderUrl(name.to_string()));
        }
        Ok(())
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Name of the provider for requests without a model.
    pub fn default_provider_name(&self) -> Option<&str> {
        self.default_provider
            .as_deref()
            .or_else(|| self.providers.keys().next().map(String::as_str))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.providers.is_empty() {
            return Err(ValidationError::NoAiProviderConfigured);
        }
        for (name, provider) in &self.providers {
            provider.validate(name)?;
        }
        if let Some(name) = &self.default_provider {
            if !self.providers.contains_key(name) {
                return Err(ValidationError::UnknownDefaultProvider(name.clone()));
            }
        }
        for (model, provider) in &self.models {
            if !self.providers.contains_key(provider) {
                return Err(ValidationError::UnknownProvider {
                    model: model.clone(),
                    provider: provider.clone(),
                });
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            providers: BTreeMap::new(),
            models: BTreeMap::new(),
            default_provider: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::OpenAI,
            base_url: "https://dashscope.example.com/v1".to_string(),
            api_key: key.map(|k| Secret::new(k.to_string())),
            default_model: None,
        }
    }

    fn config() -> AiConfig {
        let mut cfg = AiConfig::default();
        cfg.providers.insert("dashscope".into(), provider(Some("sk-1")));
        cfg.models.insert("qwen-plus".into(), "dashscope".into());
        cfg
    }

    #[test]
    fn valid_config_passes() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.default_provider_name(), Some("dashscope"));
        assert_eq!(cfg.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn no_provider_is_rejected() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::NoAiProviderConfigured)
        );
    }

    #[test]
    fn blank_api_key_is_missing() {
        let mut cfg = config();
        cfg.providers.insert("deepseek".into(), provider(Some("  ")));
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::MissingApiKey("deepseek".into()))
        );
    }

    #[test]
    fn mock_provider_needs_no_key() {
        let mut cfg = config();
        cfg.providers.insert(
            "local".into(),
            ProviderConfig {
                kind: ProviderKind::Mock,
                ..provider(None)
            },
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn model_must_point_at_known_provider() {
        let mut cfg = config();
        cfg.models.insert("deepseek-chat".into(), "deepseek".into());
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::UnknownProvider {
                model: "deepseek-chat".into(),
                provider: "deepseek".into(),
            })
        );
    }

    #[test]
    fn explicit_default_provider_must_exist() {
        let mut cfg = config();
        cfg.default_provider = Some("openai".into());
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::UnknownDefaultProvider(_))
        ));
    }
}
