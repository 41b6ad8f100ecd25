//! Model Router - Dispatches each request to the provider serving its model.
//!
//! Personas name a model; configuration maps models to providers. The
//! router is itself an `AIProvider`, so handlers never see which vendor
//! answers.
//!
//! # Example
//!
//! ```ignore
//! let router = ModelRouter::new("dashscope")
//!     .with_provider("dashscope", Arc::new(dashscope))
//!     .with_provider("deepseek", Arc::new(deepseek))
//!     .with_model("qwen-plus", "dashscope")
//!     .with_model("deepseek-chat", "deepseek");
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream,
};

/// `AIProvider` that picks a backend per request model.
#[derive(Clone)]
pub struct ModelRouter {
    providers: HashMap<String, Arc<dyn AIProvider>>,
    models: HashMap<String, String>,
    /// Provider for requests without a model.
    default_provider: String,
}

impl ModelRouter {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            models: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    pub fn with_provider(mut self, name: impl Into<String>, provider: Arc<dyn AIProvider>) -> Self {
        self.providers.insert(name.into(), provider);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, provider: impl Into<String>) -> Self {
        self.models.insert(model.into(), provider.into());
        self
    }

    /// Resolves the provider for `request`.
    ///
    /// # Errors
    ///
    /// `AIError::InvalidRequest` if the model or its provider is unknown.
    fn route(&self, request: &CompletionRequest) -> Result<&Arc<dyn AIProvider>, AIError> {
        let provider_name = match request.model.as_deref() {
            Some(model) if !model.is_empty() => self
                .models
                .get(model)
                .ok_or_else(|| AIError::InvalidRequest(format!("no provider configured for model '{model}'")))?,
            _ => &self.default_provider,
        };
        debug!(model = ?request.model, provider = %provider_name, "routing completion");
        self.providers
            .get(provider_name)
            .ok_or_else(|| AIError::InvalidRequest(format!("provider '{provider_name}' is not configured")))
    }
}

#[async_trait]
impl AIProvider for ModelRouter {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.route(&request)?.complete(request).await
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError> {
        self.route(&request)?.stream_complete(request).await
    }
}
