//! OpenAI Chat Completions client.
//!
//! Talks to `POST {base_url}/v1/chat/completions`, either buffered
//! (`stream: false`) or as SSE (`stream: true`). Streamed chunks are
//! normalized to [`LlmEvent`]s.
//!
//! ```rust,no_run
//! use hyde_rag::llm::ChatProvider;
//! use hyde_rag::llm::message::Message;
//! use hyde_rag::llm::openai::{OpenAiChat, OpenAiConfig};
//! use hyde_rag::llm::types::RequestOptions;
//!
//! # async fn example() -> hyde_rag::error::Result<()> {
//! let chat = OpenAiChat::new(OpenAiConfig::new("sk-...", "gpt-3.5-turbo"))?;
//! let reply = chat
//!     .complete(&[Message::user("Hello")], &RequestOptions::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::error::RagError;
use crate::llm::events::{FinishReason, LlmEvent};
use crate::llm::message::Message;
use crate::llm::sse::SseDecoder;
use crate::llm::types::RequestOptions;
use crate::llm::{ChatProvider, LlmEventStream};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

// ── Configuration ─────────────────────────────────────────────

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Bearer token.
    pub api_key: String,
    /// API root, without the `/v1/...` path.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Timeout for buffered requests and connection setup.
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAiConfig {
    /// Create a config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: model.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Build a client shared by chat and embedding calls.
pub(crate) fn build_client(config: &OpenAiConfig) -> Result<reqwest::Client, RagError> {
    if config.api_key.trim().is_empty() {
        return Err(RagError::Config("missing OpenAI API key".into()));
    }
    reqwest::Client::builder()
        .connect_timeout(config.timeout)
        .build()
        .map_err(|e| RagError::Config(format!("failed to build HTTP client: {e}")))
}

// ── Request / response mapping ────────────────────────────────

/// Build the JSON request body for the Chat Completions API.
pub fn build_chat_request(
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
    stream: bool,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "stream": stream,
    });

    if let Some(obj) = body.as_object_mut() {
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".into(), serde_json::json!(max_tokens));
        }
        if let Some(temp) = options.temperature {
            obj.insert("temperature".into(), serde_json::json!(temp));
        }
        if options.json_mode {
            obj.insert(
                "response_format".into(),
                serde_json::json!({"type": "json_object"}),
            );
        }
    }

    body
}

/// Pull `choices[0].message.content` out of a buffered completion.
pub fn parse_chat_response(body: &str) -> Result<String, RagError> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| RagError::Provider(format!("invalid completion response: {e}")))?;

    parsed
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(String::from)
        .ok_or_else(|| RagError::Provider("completion response has no message content".into()))
}

/// Convert one streamed `data:` payload into events.
///
/// Unparseable payloads yield nothing; an embedded `error` object yields
/// a [`LlmEvent::StreamError`].
pub fn parse_stream_chunk(data: &str) -> Vec<LlmEvent> {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) else {
        return Vec::new();
    };

    if let Some(err) = parsed.get("error") {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown stream error");
        return vec![LlmEvent::StreamError {
            error: message.to_string(),
        }];
    }

    let mut events = Vec::new();
    let Some(choices) = parsed.get("choices").and_then(|c| c.as_array()) else {
        return events;
    };

    for choice in choices {
        if let Some(content) = choice
            .get("delta")
            .and_then(|d| d.get("content"))
            .and_then(|c| c.as_str())
            .filter(|c| !c.is_empty())
        {
            events.push(LlmEvent::TextDelta {
                text: content.to_string(),
            });
        }
        if let Some(reason) = choice.get("finish_reason").and_then(|f| f.as_str()) {
            events.push(LlmEvent::StreamEnd {
                finish_reason: FinishReason::from_wire(reason),
            });
        }
    }

    events
}

/// Map an HTTP error status to the appropriate [`RagError`].
pub(crate) fn map_http_error(status: reqwest::StatusCode, body: &str) -> RagError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 | 403 => RagError::Auth(format!("OpenAI authentication failed: {message}")),
        429 => RagError::Request(format!("OpenAI rate limited: {message}")),
        code => RagError::Provider(format!("OpenAI HTTP {code}: {message}")),
    }
}

/// Extract `error.message` from an OpenAI error body, or fall back to the body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

// ── Client ────────────────────────────────────────────────────

/// Chat client for OpenAI and compatible endpoints.
pub struct OpenAiChat {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl OpenAiChat {
    /// Create a chat client.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key is empty or the HTTP
    /// client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, RagError> {
        let client = build_client(&config)?;
        Ok(Self { config, client })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn post(
        &self,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, RagError> {
        let url = self.config.endpoint("/v1/chat/completions");
        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RagError::Request(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<String, RagError> {
        let body = build_chat_request(&self.config.model, messages, options, false);
        let response = self.post(&body, Some(self.config.timeout)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| RagError::Request(format!("failed to read OpenAI response: {e}")))?;
        parse_chat_response(&text)
    }

    async fn stream(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<LlmEventStream, RagError> {
        let body = build_chat_request(&self.config.model, messages, options, true);
        // No overall deadline: a long answer may legitimately stream for minutes.
        let response = self.post(&body, None).await?;

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("openai-req")
            .to_string();

        Ok(Box::pin(create_event_stream(
            response.bytes_stream(),
            request_id,
            self.config.model.clone(),
        )))
    }
}

/// Internal state for the event stream.
struct StreamState {
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    decoder: SseDecoder,
    request_id: String,
    model: String,
    started: bool,
    finished: bool,
    pending: VecDeque<LlmEvent>,
}

impl StreamState {
    fn queue(&mut self, data: &str) {
        self.pending.extend(parse_stream_chunk(data));
    }
}

/// Turn a response byte stream into an [`LlmEvent`] stream.
fn create_event_stream(
    byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    request_id: String,
    model: String,
) -> impl Stream<Item = LlmEvent> + Send {
    futures_util::stream::unfold(
        StreamState {
            byte_stream: Box::pin(byte_stream),
            decoder: SseDecoder::new(),
            request_id,
            model,
            started: false,
            finished: false,
            pending: VecDeque::new(),
        },
        |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    if matches!(event, LlmEvent::StreamError { .. }) {
                        state.pending.clear();
                        state.finished = true;
                    }
                    return Some((event, state));
                }
                if state.finished {
                    return None;
                }

                if !state.started {
                    state.started = true;
                    let start = LlmEvent::StreamStart {
                        request_id: state.request_id.clone(),
                        model: state.model.clone(),
                    };
                    return Some((start, state));
                }

                match state.byte_stream.next().await {
                    Some(Ok(chunk)) => {
                        for frame in state.decoder.push(&chunk) {
                            if frame.is_done() {
                                state.finished = true;
                                break;
                            }
                            state.queue(&frame.data);
                        }
                    }
                    Some(Err(e)) => {
                        state.finished = true;
                        state.pending.clear();
                        return Some((
                            LlmEvent::StreamError {
                                error: format!("stream read error: {e}"),
                            },
                            state,
                        ));
                    }
                    None => {
                        state.finished = true;
                        if let Some(frame) = state.decoder.finish() {
                            if !frame.is_done() {
                                state.queue(&frame.data);
                            }
                        }
                    }
                }
            }
        },
    )
}
