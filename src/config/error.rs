//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors found while checking a loaded configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("No AI provider configured")]
    NoAiProviderConfigured,

    #[error("Provider '{0}' has no API key")]
    MissingApiKey(String),

    #[error("Provider '{0}' has an invalid base URL")]
    InvalidProviderUrl(String),

    #[error("Default provider '{0}' is not configured")]
    UnknownDefaultProvider(String),

    #[error("Model '{model}' points at unknown provider '{provider}'")]
    UnknownProvider { model: String, provider: String },

    #[error("Persona '{persona}' uses unmapped model '{model}'")]
    UnmappedModel { persona: String, model: String },

    #[error("Persona id '{0}' is defined more than once")]
    DuplicatePersona(String),

    #[error("Persona '{0}' has an empty name")]
    UnnamedPersona(String),

    #[error("Group '{group}' lists unknown persona '{persona}'")]
    UnknownGroupMember { group: String, persona: String },

    #[error("No persona groups configured")]
    NoGroups,

    #[error("Scheduler {role} persona '{id}' is not configured")]
    UnknownSchedulerPersona { role: &'static str, id: String },

    #[error("Guest quota must be at least 1")]
    InvalidGuestQuota,

    #[error("History limit must be at least 1")]
    InvalidHistoryLimit,

    #[error("Assessment catalog file not found: {0}")]
    CatalogNotFound(String),
}
