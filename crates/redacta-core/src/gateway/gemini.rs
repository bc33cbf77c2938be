//! Gemini client: structured-output one-shots plus SSE chat streaming.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::chat::{ChatMessage, ChatMode};
use crate::error::GatewayError;
use crate::model::{EssayCorrection, ProbableTheme, SimulationQuestion};
use crate::storage::GatewayConfig;

use super::prompts;
use super::{ChatStream, TutorGateway};

/// HTTP client for the Gemini generateContent API.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl GeminiClient {
    /// Build a client from configuration, taking the API key from the
    /// `GEMINI_API_KEY` environment variable.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingApiKey)?;
        Self::with_api_key(config, api_key)
    }

    /// Build a client with an explicit API key (tests point the
    /// endpoint at a local mock server).
    pub fn with_api_key(
        config: &GatewayConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            temperature: config.temperature,
        })
    }

    /// One non-streaming call constrained by a response schema, decoded
    /// into `T` through the candidate text.
    async fn generate<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
        with_search: bool,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });
        if with_search {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }

        tracing::debug!(model = %self.model, with_search, "gateway request");
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        let value: Value = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        let text = candidate_text(&value).ok_or(GatewayError::EmptyResponse)?;
        serde_json::from_str(&text).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TutorGateway for GeminiClient {
    async fn correct_essay(
        &self,
        essay: &str,
        rigorous: bool,
    ) -> Result<EssayCorrection, GatewayError> {
        self.generate(
            &prompts::correction_prompt(essay, rigorous),
            prompts::correction_schema(),
            false,
        )
        .await
    }

    async fn generate_simulation(
        &self,
        count: u32,
        subjects: &[String],
    ) -> Result<Vec<SimulationQuestion>, GatewayError> {
        self.generate(
            &prompts::simulation_prompt(count, subjects),
            prompts::simulation_schema(),
            false,
        )
        .await
    }

    async fn probable_themes(&self) -> Result<Vec<ProbableTheme>, GatewayError> {
        self.generate(prompts::THEMES_PROMPT, prompts::themes_schema(), true)
            .await
    }

    async fn stream_chat(
        &self,
        mode: ChatMode,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<ChatStream, GatewayError> {
        let url = format!(
            "{}/models/{}:streamGenerateContent",
            self.endpoint, self.model
        );
        let mut contents: Vec<Value> = history
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.wire_name(),
                    "parts": [{ "text": msg.text }]
                })
            })
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

        let body = json!({
            "systemInstruction": { "parts": [{ "text": prompts::system_instruction(mode) }] },
            "contents": contents,
            "generationConfig": { "temperature": self.temperature }
        });

        tracing::debug!(model = %self.model, mode = mode.as_str(), "chat stream request");
        let resp = self
            .http
            .post(&url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec()));
        Ok(sse_delta_stream(Box::pin(bytes)))
    }
}

/// Concatenated text of the first candidate's parts, if any.
fn candidate_text(value: &Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// One SSE line; `Ok(None)` for keep-alives, comments and chunks
/// without candidate text (e.g. the trailing usage record).
fn parse_sse_line(line: &str) -> Result<Option<String>, GatewayError> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    Ok(candidate_text(&value))
}

struct SseState {
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Vec<u8>>> + Send>>,
    buf: String,
    pending: VecDeque<String>,
    failed: bool,
}

/// Fold a raw byte stream into per-fragment text deltas, preserving
/// arrival order. The stream ends after the first error.
fn sse_delta_stream(
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Vec<u8>>> + Send>>,
) -> ChatStream {
    let state = SseState {
        inner,
        buf: String::new(),
        pending: VecDeque::new(),
        failed: false,
    };
    Box::pin(futures::stream::unfold(state, |mut st| async move {
        if st.failed {
            return None;
        }
        loop {
            if let Some(delta) = st.pending.pop_front() {
                return Some((Ok(delta), st));
            }
            match st.inner.next().await {
                Some(Ok(chunk)) => {
                    st.buf.push_str(&String::from_utf8_lossy(&chunk));
                    while let Some(pos) = st.buf.find('\n') {
                        let line: String = st.buf.drain(..=pos).collect();
                        match parse_sse_line(line.trim()) {
                            Ok(Some(text)) => st.pending.push_back(text),
                            Ok(None) => {}
                            Err(e) => {
                                st.failed = true;
                                return Some((Err(e), st));
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    st.failed = true;
                    return Some((Err(GatewayError::Http(e.to_string())), st));
                }
                None => return None,
            }
        }
    }))
}
