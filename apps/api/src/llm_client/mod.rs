//! Client for the Anthropic Messages API.
//!
//! All model calls go through the [`GenerationBackend`] trait so handlers
//! can be tested against a scripted backend. [`AnthropicClient`] is the
//! production implementation; it supports buffered completions and
//! incremental streaming over server-sent events. No other module may
//! call the API directly.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod sse;

use sse::SseDecoder;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Model tier for a call: Sonnet where answer quality is graded, Haiku
/// where a cheap structured response is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Sonnet,
    Haiku,
}

impl ModelTier {
    /// Pinned model identifiers. The pricing table below must move with
    /// these.
    pub fn model_id(self) -> &'static str {
        match self {
            ModelTier::Sonnet => "claude-sonnet-4-5-20250929",
            ModelTier::Haiku => "claude-haiku-4-5-20251001",
        }
    }

    pub fn pricing(self) -> Pricing {
        match self {
            ModelTier::Sonnet => Pricing {
                input_per_mtok: 3.0,
                output_per_mtok: 15.0,
            },
            ModelTier::Haiku => Pricing {
                input_per_mtok: 0.25,
                output_per_mtok: 1.25,
            },
        }
    }
}

/// Dollar prices per million tokens.
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

impl Pricing {
    pub fn cost_usd(&self, usage: &Usage) -> f64 {
        (usage.input_tokens as f64 / 1_000_000.0) * self.input_per_mtok
            + (usage.output_tokens as f64 / 1_000_000.0) * self.output_per_mtok
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("model returned empty content")]
    EmptyContent,

    #[error("stream ended before completion")]
    Truncated,
}

/// One decoded upstream event. Deltas carry text in arrival order; the
/// completion event carries final token counts and arrives last.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    TextDelta(String),
    Completed(Usage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Parameters for a single generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub tier: ModelTier,
    pub max_tokens: u32,
    pub system: String,
    pub user: String,
}

pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, GenerationError>> + Send>>;

/// The seam between HTTP handlers and the model API.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Streams a response as text deltas followed by a completion event.
    async fn stream(&self, request: GenerationRequest) -> Result<EventStream, GenerationError>;

    /// Buffers a full response and returns its text with token usage.
    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> Result<(String, Usage), GenerationError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<MessageParam<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Production backend over the Anthropic Messages API. Failed calls are
/// not retried here; callers surface the error to the client, which owns
/// the retry decision.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn send(
        &self,
        request: &GenerationRequest,
        stream: bool,
    ) -> Result<reqwest::Response, GenerationError> {
        let body = MessagesRequest {
            model: request.tier.model_id(),
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: vec![MessageParam {
                role: "user",
                content: &request.user,
            }],
            stream,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the structured message when the body parses.
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Messages API returned {}: {}", status, message);
            return Err(GenerationError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerationBackend for AnthropicClient {
    async fn stream(&self, request: GenerationRequest) -> Result<EventStream, GenerationError> {
        let response = self.send(&request, true).await?;
        let body = Box::pin(response.bytes_stream());
        let decoder = SseDecoder::new();

        let events = futures_util::stream::try_unfold(
            (body, decoder, VecDeque::new()),
            |(mut body, mut decoder, mut pending)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Ok(Some((event, (body, decoder, pending))));
                    }
                    match body.next().await {
                        Some(chunk) => pending.extend(decoder.push(&chunk?)?),
                        None => return Ok(None),
                    }
                }
            },
        );

        Ok(Box::pin(events))
    }

    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> Result<(String, Usage), GenerationError> {
        let response = self.send(&request, false).await?;
        let parsed: MessagesResponse = response.json().await?;

        debug!(
            "completion finished: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        let text = parsed.text().ok_or(GenerationError::EmptyContent)?;
        Ok((text.to_string(), parsed.usage))
    }
}

#[cfg(test)]
pub mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Scripted backend for handler tests. Each script entry is consumed
    /// by at most one call.
    #[derive(Default)]
    pub struct MockBackend {
        stream_script: Mutex<Option<StreamScript>>,
        complete_script: Mutex<Option<Result<(String, Usage), GenerationError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    type StreamScript = Result<Vec<Result<StreamEvent, GenerationError>>, GenerationError>;

    impl MockBackend {
        pub fn with_stream(events: Vec<Result<StreamEvent, GenerationError>>) -> Self {
            Self {
                stream_script: Mutex::new(Some(Ok(events))),
                ..Self::default()
            }
        }

        pub fn with_stream_error(error: GenerationError) -> Self {
            Self {
                stream_script: Mutex::new(Some(Err(error))),
                ..Self::default()
            }
        }

        pub fn with_completion(text: &str, usage: Usage) -> Self {
            Self {
                complete_script: Mutex::new(Some(Ok((text.to_string(), usage)))),
                ..Self::default()
            }
        }

        pub fn with_completion_error(error: GenerationError) -> Self {
            Self {
                complete_script: Mutex::new(Some(Err(error))),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().len()
        }

        pub fn last_request(&self) -> Option<GenerationRequest> {
            self.requests.lock().last().cloned()
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        async fn stream(
            &self,
            request: GenerationRequest,
        ) -> Result<EventStream, GenerationError> {
            self.requests.lock().push(request);
            match self.stream_script.lock().take() {
                Some(Ok(events)) => Ok(Box::pin(futures_util::stream::iter(events))),
                Some(Err(e)) => Err(e),
                None => Err(GenerationError::Protocol("no scripted stream".to_string())),
            }
        }

        async fn complete(
            &self,
            request: GenerationRequest,
        ) -> Result<(String, Usage), GenerationError> {
            self.requests.lock().push(request);
            match self.complete_script.lock().take() {
                Some(result) => result,
                None => Err(GenerationError::Protocol(
                    "no scripted completion".to_string(),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_are_pinned() {
        assert_eq!(ModelTier::Sonnet.model_id(), "claude-sonnet-4-5-20250929");
        assert_eq!(ModelTier::Haiku.model_id(), "claude-haiku-4-5-20251001");
    }

    #[test]
    fn test_cost_tracks_token_usage() {
        let usage = Usage {
            input_tokens: 1_000,
            output_tokens: 2_000,
        };

        let sonnet = ModelTier::Sonnet.pricing().cost_usd(&usage);
        assert!((sonnet - 0.033).abs() < 1e-9);

        let haiku = ModelTier::Haiku.pricing().cost_usd(&usage);
        assert!((haiku - 0.00275).abs() < 1e-9);
    }

    #[test]
    fn test_zero_usage_costs_nothing() {
        let usage = Usage {
            input_tokens: 0,
            output_tokens: 0,
        };
        assert_eq!(ModelTier::Sonnet.pricing().cost_usd(&usage), 0.0);
    }

    #[test]
    fn test_messages_request_shape() {
        let request = MessagesRequest {
            model: ModelTier::Haiku.model_id(),
            max_tokens: 1024,
            system: "You are a grader.",
            messages: vec![MessageParam {
                role: "user",
                content: "TASK:\nsummarize",
            }],
            stream: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-haiku-4-5-20251001");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["system"], "You are a grader.");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "TASK:\nsummarize");
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn test_response_text_finds_first_text_block() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"tool_use","text":null},{"type":"text","text":"hello"}],"usage":{"input_tokens":5,"output_tokens":3}}"#,
        )
        .unwrap();

        assert_eq!(response.text(), Some("hello"));
        assert_eq!(response.usage.input_tokens, 5);
    }

    #[test]
    fn test_response_without_text_block_is_empty() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[],"usage":{"input_tokens":5,"output_tokens":0}}"#,
        )
        .unwrap();

        assert_eq!(response.text(), None);
    }
}
