//! Mock AI Provider for testing.
//!
//! Scripted replies for the `AIProvider` port so chat flows and the tag
//! classifier can be exercised without a real model.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Drink more water today.")
//!     .with_broken_stream("Half a rep", MockError::Network { message: "reset".into() });
//! ```

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    StreamChunk, TokenUsage,
};

/// Reply used once the scripted queue is empty.
pub const DEFAULT_MOCK_REPLY: &str = "Mock response";

const MOCK_MODEL: &str = "mock-model-1";

/// Mock AI provider.
///
/// Scripted replies are consumed in order by both `complete` and
/// `stream_complete`. Every request is recorded.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The whole reply succeeds.
    Reply { content: String },
    /// The request itself fails.
    Error(MockError),
    /// Streaming starts, yields `partial`, then fails with `error`.
    /// Non-streaming calls fail with `error` straight away.
    BrokenStream { partial: String, error: MockError },
}

/// Failures a scripted reply can produce.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Reply {
            content: content.into(),
        })
    }

    /// Queues a failing request.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Queues a stream that breaks after `partial`.
    pub fn with_broken_stream(self, partial: impl Into<String>, error: MockError) -> Self {
        self.push(MockResponse::BrokenStream {
            partial: partial.into(),
            error,
        })
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Requests received so far, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.lock_calls().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
        self
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<CompletionRequest>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn record(&self, request: CompletionRequest) -> MockResponse {
        self.lock_calls().push(request);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| MockResponse::Reply {
                content: DEFAULT_MOCK_REPLY.to_string(),
            })
    }
}

/// Splits `content` into word chunks whose concatenation is `content`.
fn word_chunks(content: &str) -> Vec<Result<StreamChunk, AIError>> {
    content
        .split_inclusive(' ')
        .map(|word| Ok(StreamChunk::content(word)))
        .collect()
}

fn usage_for(content: &str) -> TokenUsage {
    TokenUsage::new(10, content.split_whitespace().count() as u32)
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        match self.record(request).await {
            MockResponse::Reply { content } => Ok(CompletionResponse {
                usage: usage_for(&content),
                content,
                model: MOCK_MODEL.to_string(),
                finish_reason: FinishReason::Stop,
            }),
            MockResponse::Error(err) | MockResponse::BrokenStream { error: err, .. } => {
                Err(err.into())
            }
        }
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError> {
        match self.record(request).await {
            MockResponse::Reply { content } => {
                let usage = usage_for(&content);
                let done = stream::once(async move {
                    Ok(StreamChunk::finished(FinishReason::Stop, usage))
                });
                Ok(Box::pin(stream::iter(word_chunks(&content)).chain(done)))
            }
            MockResponse::Error(err) => Err(err.into()),
            MockResponse::BrokenStream { partial, error } => {
                let failure = stream::once(async move { Err(AIError::from(error)) });
                Ok(Box::pin(stream::iter(word_chunks(&partial)).chain(failure)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::{Message, RequestMetadata};

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(UserId::new("u1").unwrap(), "trace-1"))
            .push(Message::user("Hello"))
    }

    async fn collect(
        provider: &MockAIProvider,
    ) -> (String, Option<StreamChunk>, Option<AIError>) {
        let mut stream = provider.stream_complete(test_request()).await.unwrap();
        let mut content = String::new();
        let mut last = None;
        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) if chunk.is_final() => last = Some(chunk),
                Ok(chunk) => content.push_str(&chunk.delta),
                Err(err) => return (content, last, Some(err)),
            }
        }
        (content, last, None)
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order_then_default() {
        let provider = MockAIProvider::new().with_response("First").with_response("Second");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();
        let r3 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
        assert_eq!(r3.content, DEFAULT_MOCK_REPLY);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn stream_reassembles_exact_reply() {
        let provider = MockAIProvider::new().with_response("Drink  water, often.");

        let (content, last, err) = collect(&provider).await;

        assert_eq!(content, "Drink  water, often.");
        assert_eq!(last.unwrap().finish_reason, Some(FinishReason::Stop));
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn broken_stream_yields_partial_then_error() {
        let provider = MockAIProvider::new().with_broken_stream(
            "Half a ",
            MockError::Network {
                message: "reset".into(),
            },
        );

        let (content, last, err) = collect(&provider).await;

        assert_eq!(content, "Half a ");
        assert!(last.is_none());
        assert!(matches!(err, Some(AIError::Network(_))));
    }

    #[tokio::test]
    async fn request_error_fails_before_streaming() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".into(),
        });

        let result = provider.stream_complete(test_request()).await;

        assert!(matches!(result, Err(AIError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let provider = MockAIProvider::new();
        provider.complete(test_request()).await.unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages[0].content, "Hello");
    }

    #[tokio::test]
    async fn delay_is_applied() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(20));

        let start = std::time::Instant::now();
        provider.complete(test_request()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn mock_error_converts_to_ai_error() {
        let err: AIError = MockError::RateLimited { retry_after_secs: 10 }.into();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 10 }));
        let err: AIError = MockError::Timeout { timeout_secs: 30 }.into();
        assert!(err.is_retryable());
    }
}
