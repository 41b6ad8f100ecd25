//! OpenAI-compatible Provider - `AIProvider` over a `/chat/completions` API.
//!
//! Works against any vendor speaking the OpenAI chat completion protocol
//! (DashScope, DeepSeek, OpenAI itself). The model comes from the request;
//! the configured default is used only when the request names none.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new("dashscope", api_key)
//!     .with_base_url("https://dashscope.aliyuncs.com/compatible-mode/v1")
//!     .with_default_model("qwen-plus");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! # Streaming
//!
//! Replies stream as Server-Sent Events. Network chunks do not align with
//! event lines, so partial lines are buffered until their newline arrives.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    MessageRole, StreamChunk, TokenUsage,
};

/// Configuration for one OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Provider name used in logs.
    pub name: String,
    api_key: Secret<String>,
    pub base_url: String,
    /// Model used when a request names none.
    pub default_model: String,
    pub timeout: Duration,
    /// Maximum retries on transient failures (non-streaming only).
    pub max_retries: u32,
}

impl OpenAIConfig {
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible provider.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// # Errors
    ///
    /// `AIError::InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("http client: {e}")))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn model_for<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        request
            .model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.config.default_model)
    }

    fn to_wire_request(&self, request: &CompletionRequest, stream: bool) -> WireRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
                name: None,
            });
        }

        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
                name: msg.name.clone().filter(|n| !n.is_empty()),
            });
        }

        WireRequest {
            model: self.model_for(request).to_string(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
        }
    }

    async fn send(&self, request: &CompletionRequest, stream: bool) -> Result<Response, AIError> {
        let body = self.to_wire_request(request, stream);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {e}"))
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        check_status(response).await
    }

    async fn complete_once(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send(request, false).await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {e}")))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            usage: wire
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            model: wire.model,
            finish_reason: finish_reason(choice.finish_reason.as_deref()),
        })
    }
}

/// Maps error statuses onto `AIError`.
async fn check_status(response: Response) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status.as_u16() {
        401 | 403 => Err(AIError::AuthenticationFailed),
        429 => Err(AIError::rate_limited(parse_retry_after(&body))),
        400 if body.contains("context_length_exceeded") || body.contains("maximum context length") => {
            Err(AIError::ContextTooLong)
        }
        400 => Err(AIError::InvalidRequest(body)),
        500..=599 => Err(AIError::unavailable(format!("Server error {status}: {body}"))),
        _ => Err(AIError::network(format!("Unexpected status {status}: {body}"))),
    }
}

/// Seconds from a "try again in Ns" hint, else 30.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_owned))
        .and_then(|msg| {
            let rest = &msg[msg.find("try again in ")? + "try again in ".len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

fn finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut attempt = 0;
        loop {
            match self.complete_once(&request).await {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    warn!(provider = %self.config.name, attempt, error = %err, "completion failed, retrying");
                    // 1s, 2s, 4s, ...
                    sleep(Duration::from_secs(1 << attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError> {
        let response = self.send(&request, true).await?;

        let events = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| AIError::network(format!("Stream error: {e}"))))
            .scan(SseBuffer::default(), |buffer, chunk| {
                let parsed = match chunk {
                    Ok(bytes) => buffer.feed(&String::from_utf8_lossy(&bytes)),
                    Err(err) => vec![Err(err)],
                };
                futures::future::ready(Some(parsed))
            })
            .flat_map(stream::iter);

        Ok(Box::pin(events))
    }
}

/// Holds the unterminated tail of the SSE byte stream.
#[derive(Debug, Default)]
struct SseBuffer {
    pending: String,
}

impl SseBuffer {
    /// Appends `text` and parses every complete line.
    fn feed(&mut self, text: &str) -> Vec<Result<StreamChunk, AIError>> {
        self.pending.push_str(text);
        let mut results = Vec::new();
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            if let Some(parsed) = parse_sse_line(line.trim_end()) {
                results.push(parsed);
            }
        }
        results
    }
}

/// Parses one `data:` line. Comments, blank lines and `[DONE]` yield nothing.
fn parse_sse_line(line: &str) -> Option<Result<StreamChunk, AIError>> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let chunk: WireStreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => return Some(Err(AIError::parse(format!("Failed to parse SSE chunk: {e}")))),
    };

    let usage = chunk
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));
    let choice = chunk.choices.into_iter().next();

    match choice {
        Some(WireStreamChoice {
            finish_reason: Some(reason),
            delta,
        }) => Some(Ok(StreamChunk {
            delta: delta.content.unwrap_or_default(),
            finish_reason: Some(finish_reason(Some(&reason))),
            usage: Some(usage.unwrap_or_default()),
        })),
        Some(WireStreamChoice { delta, .. }) => delta
            .content
            .filter(|c| !c.is_empty())
            .map(|c| Ok(StreamChunk::content(c))),
        None => None,
    }
}

// ----- wire types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireStreamChunk {
    #[serde(default)]
    choices: Vec<WireStreamChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireStreamChoice {
    #[serde(default)]
    delta: WireDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDelta {
    content: Option<String>,
}
