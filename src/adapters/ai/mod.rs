//! AI Provider Adapters.
//!
//! Implementations of the AIProvider and TagClassifier ports.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - Any OpenAI-compatible chat completion endpoint
//! - `ModelRouter` - Sends each request to the provider serving its model
//! - `LlmTagClassifier` - Tag classification through the router persona
//! - `MockAIProvider` - Scripted replies for tests and offline runs

mod mock_provider;
mod model_router;
mod openai_provider;
mod tag_classifier;

pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_REPLY};
pub use model_router::ModelRouter;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use tag_classifier::LlmTagClassifier;
