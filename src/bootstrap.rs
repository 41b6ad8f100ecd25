//! Composition root: turns a validated [`AppConfig`] into the HTTP router.
//!
//! Storage falls back to in-memory adapters when `database` or `redis` is
//! not configured, so a bare config with a `mock` provider runs end to end.

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use crate::adapters::ai::{LlmTagClassifier, MockAIProvider, ModelRouter, OpenAIConfig, OpenAIProvider};
use crate::adapters::http::{
    api_router, AppHandlers, AssessmentHandlers, ChatHandlers, InitHandlers, PlanHandlers,
    ProgressHandlers,
};
use crate::adapters::memory::{
    InMemoryAssessmentRepository, InMemoryChatRepository, InMemoryPlanRepository,
    InMemoryQuotaRepository,
};
use crate::adapters::personas::StaticPersonaDirectory;
use crate::adapters::postgres::{
    PostgresAssessmentRepository, PostgresChatRepository, PostgresPlanRepository,
};
use crate::adapters::redis::RedisQuotaRepository;
use crate::application::handlers::{
    AssessmentFlow, CompleteTaskHandler, GeneratePlanHandler, GenerateReportHandler,
    GetActivePlanHandler, GetPlanDetailsHandler, GetResultHandler, InitializeClientHandler,
    ListUserPlansHandler, ScheduleResponsesHandler, SendChatMessageHandler, SkipTaskHandler,
    StartOrContinueHandler, SubmitAnswerHandler,
};
use crate::config::{AiConfig, AppConfig, ConfigError, ProviderKind, ValidationError};
use crate::domain::assessment::CatalogError;
use crate::domain::foundation::DomainError;
use crate::ports::{
    AIError, AIProvider, AssessmentRepository, ChatRepository, PersonaDirectory, PlanRepository,
    QuotaRepository, TagClassifier,
};

/// Failures before the server starts accepting requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("Question catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis: {0}")]
    Redis(DomainError),

    #[error("AI provider '{name}': {source}")]
    Provider {
        name: String,
        #[source]
        source: AIError,
    },

    #[error("Server: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage ports of the application.
#[derive(Clone)]
pub struct Stores {
    pub assessments: Arc<dyn AssessmentRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub quotas: Arc<dyn QuotaRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            assessments: Arc::new(InMemoryAssessmentRepository::new()),
            chats: Arc::new(InMemoryChatRepository::new()),
            plans: Arc::new(InMemoryPlanRepository::new()),
            quotas: Arc::new(InMemoryQuotaRepository::new()),
        }
    }

    /// Connects the configured backends; the rest stay in memory.
    pub async fn connect(config: &AppConfig) -> Result<Self, StartupError> {
        let mut stores = Self::in_memory();

        if let Some(database) = &config.database {
            let pool = PgPoolOptions::new()
                .min_connections(database.min_connections)
                .max_connections(database.max_connections)
                .acquire_timeout(database.acquire_timeout())
                .connect(&database.url)
                .await?;
            if database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                info!("database migrations applied");
            }
            stores.assessments = Arc::new(PostgresAssessmentRepository::new(pool.clone()));
            stores.chats = Arc::new(PostgresChatRepository::new(pool.clone()));
            stores.plans = Arc::new(PostgresPlanRepository::new(pool));
            info!(max_connections = database.max_connections, "using PostgreSQL stores");
        } else {
            info!("no database configured; using in-memory stores");
        }

        if let Some(redis) = &config.redis {
            let quotas = RedisQuotaRepository::connect(&redis.url)
                .await
                .map_err(StartupError::Redis)?;
            stores.quotas = Arc::new(quotas);
            info!("using Redis guest quotas");
        } else {
            info!("no redis configured; using in-memory guest quotas");
        }

        Ok(stores)
    }
}

/// Builds one backend per configured provider behind a [`ModelRouter`].
pub fn build_ai(config: &AiConfig) -> Result<Arc<dyn AIProvider>, StartupError> {
    let default_provider = config.default_provider_name().unwrap_or_default().to_string();
    let mut router = ModelRouter::new(default_provider);

    for (name, provider) in &config.providers {
        let backend: Arc<dyn AIProvider> = match provider.kind {
            ProviderKind::Mock => Arc::new(MockAIProvider::new()),
            ProviderKind::OpenAI => {
                let api_key = provider
                    .api_key()
                    .ok_or_else(|| ValidationError::MissingApiKey(name.clone()))?;
                let mut openai = OpenAIConfig::new(name.as_str(), api_key)
                    .with_base_url(provider.base_url.as_str())
                    .with_timeout(config.timeout())
                    .with_max_retries(config.max_retries);
                if let Some(model) = &provider.default_model {
                    openai = openai.with_default_model(model.as_str());
                }
                let backend = OpenAIProvider::new(openai).map_err(|source| StartupError::Provider {
                    name: name.clone(),
                    source,
                })?;
                Arc::new(backend)
            }
        };
        info!(provider = %name, kind = ?provider.kind, "AI provider configured");
        router = router.with_provider(name.as_str(), backend);
    }

    for (model, provider) in &config.models {
        router = router.with_model(model.as_str(), provider.as_str());
    }

    Ok(Arc::new(router))
}

/// Wires every application handler over `stores` and `ai`.
pub fn build_handlers(
    config: &AppConfig,
    stores: Stores,
    ai: Arc<dyn AIProvider>,
) -> Result<AppHandlers, StartupError> {
    let catalog = config.assessment.load_catalog()?;
    info!(questions = catalog.len(), "question catalog loaded");

    let settings = config.personas.scheduler_settings()?;
    let personas: Arc<dyn PersonaDirectory> = Arc::new(StaticPersonaDirectory::new(
        config.personas.characters.clone(),
        config.personas.groups.clone(),
    ));
    let classifier: Arc<dyn TagClassifier> = Arc::new(LlmTagClassifier::new(
        ai.clone(),
        personas.clone(),
        settings.router_id.clone(),
    ));

    let start = Arc::new(StartOrContinueHandler::new(stores.assessments.clone(), catalog.clone()));
    let submit = Arc::new(SubmitAnswerHandler::new(stores.assessments.clone(), catalog));
    let scheduler = Arc::new(ScheduleResponsesHandler::new(
        stores.assessments.clone(),
        classifier,
        settings,
    ));

    let chat = Arc::new(SendChatMessageHandler::new(
        stores.chats,
        stores.quotas.clone(),
        personas.clone(),
        scheduler,
        AssessmentFlow {
            repository: stores.assessments.clone(),
            start: start.clone(),
            submit: submit.clone(),
        },
        ai,
        config.chat.settings(config.personas.system_prompt.as_str()),
    ));
    let init = Arc::new(InitializeClientHandler::new(
        stores.quotas,
        personas,
        config.ai.models.clone(),
        config.chat.guest_quota,
    ));

    let plans = stores.plans;
    Ok(AppHandlers {
        init: InitHandlers::new(init),
        chat: ChatHandlers::new(chat),
        assessment: AssessmentHandlers::new(
            start,
            submit,
            Arc::new(GetResultHandler::new(stores.assessments)),
        ),
        plan: PlanHandlers::new(
            Arc::new(GeneratePlanHandler::new(plans.clone())),
            Arc::new(ListUserPlansHandler::new(plans.clone())),
            Arc::new(GetActivePlanHandler::new(plans.clone())),
            Arc::new(GetPlanDetailsHandler::new(plans.clone())),
            Arc::new(CompleteTaskHandler::new(plans.clone())),
            Arc::new(SkipTaskHandler::new(plans.clone())),
        ),
        progress: ProgressHandlers::new(Arc::new(GenerateReportHandler::new(plans))),
    })
}

/// Full application router for `config` over `stores`.
pub fn build_app(config: &AppConfig, stores: Stores) -> Result<Router, StartupError> {
    let ai = build_ai(&config.ai)?;
    let handlers = build_handlers(config, stores, ai)?;
    Ok(api_router(handlers, &config.server))
}
