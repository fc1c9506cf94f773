//! Google Gemini Provider
//!
//! Implements the Generative Language API v1beta: `generateContent` for
//! one-shot (optionally schema-constrained) generation and
//! `streamGenerateContent?alt=sse` for streamed chat turns.

use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use flowwright_kernel::llm::*;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Base URL (default: https://generativelanguage.googleapis.com)
    pub base_url: String,
    /// Default model id
    pub default_model: String,
    /// Default temperature
    pub default_temperature: f32,
    /// Default max output tokens
    pub default_max_tokens: u32,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            default_model: "gemini-2.5-flash".to_string(),
            default_temperature: 0.7,
            default_max_tokens: 8192,
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Fill in values from `GEMINI_API_KEY` (only when no key is set yet),
    /// `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn with_env_overrides(mut self) -> Self {
        if self.api_key.is_empty()
            && let Ok(key) = std::env::var("GEMINI_API_KEY")
        {
            self.api_key = key;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.default_model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            self.base_url = base_url;
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.default_temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.default_max_tokens = tokens;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> LLMResult<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    pub fn from_env() -> LLMResult<Self> {
        Self::with_config(GeminiConfig::from_env())
    }

    pub fn with_config(config: GeminiConfig) -> LLMResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigError(
                "Gemini API key is empty; set GEMINI_API_KEY or provider.api_key".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::ConfigError(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_for(&self, request: &ChatCompletionRequest) -> String {
        if request.model.is_empty() {
            self.config.default_model.clone()
        } else {
            request.model.clone()
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    /// Translate a provider-agnostic request into a `GenerateContentRequest` body.
    fn build_body(&self, request: &ChatCompletionRequest) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .filter_map(|m| {
                let role = match m.role {
                    Role::Assistant => "model",
                    _ => "user",
                };
                m.text_content().map(|text| {
                    serde_json::json!({
                        "role": role,
                        "parts": [{"text": text}],
                    })
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": request
                    .temperature
                    .unwrap_or(self.config.default_temperature),
                "maxOutputTokens": request
                    .max_tokens
                    .unwrap_or(self.config.default_max_tokens),
            }
        });

        if let Some(sys) = request.system_text() {
            body["systemInstruction"] = serde_json::json!({"parts": [{"text": sys}]});
        }

        if let Some(tp) = request.top_p {
            body["generationConfig"]["topP"] = serde_json::json!(tp);
        }

        if let Some(stop) = &request.stop {
            body["generationConfig"]["stopSequences"] = serde_json::json!(stop);
        }

        if let Some(format) = &request.response_format
            && format.is_json()
        {
            body["generationConfig"]["responseMimeType"] = serde_json::json!("application/json");
            if let Some(schema) = &format.json_schema {
                body["generationConfig"]["responseSchema"] = schema.clone();
            }
        }

        body
    }

    async fn post(&self, url: &str, body: &serde_json::Value) -> LLMResult<reqwest::Response> {
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.map_err(Self::map_error)?;
        Err(Self::status_error(status, text))
    }

    fn status_error(status: reqwest::StatusCode, body: String) -> LLMError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        match status.as_u16() {
            401 | 403 => LLMError::AuthError(message),
            429 => LLMError::RateLimited(message),
            code => LLMError::ApiError {
                code: Some(code.to_string()),
                message,
            },
        }
    }

    fn map_error(err: reqwest::Error) -> LLMError {
        if err.is_timeout() {
            LLMError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            LLMError::NetworkError(err.to_string())
        } else if err.is_decode() {
            LLMError::SerializationError(err.to_string())
        } else {
            LLMError::Other(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
    response_id: Option<String>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .iter()
            .find_map(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .and_then(map_finish_reason)
    }

    fn usage(&self) -> Option<Usage> {
        self.usage_metadata.as_ref().map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
    }

    fn blocked(&self) -> Option<LLMError> {
        if !self.candidates.is_empty() {
            return None;
        }
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
            .map(LLMError::ContentFiltered)
    }
}

fn map_finish_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "STOP" => Some(FinishReason::Stop),
        "MAX_TOKENS" => Some(FinishReason::Length),
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            Some(FinishReason::ContentFilter)
        }
        _ => None,
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}

/// Decode one SSE payload of `streamGenerateContent` into a chunk.
fn parse_stream_event(data: &str, model: &str) -> LLMResult<ChatCompletionChunk> {
    if let Ok(envelope) = serde_json::from_str::<GeminiErrorEnvelope>(data) {
        return Err(LLMError::ApiError {
            code: None,
            message: envelope.error.message,
        });
    }
    let parsed: GeminiResponse =
        serde_json::from_str(data).map_err(|e| LLMError::SerializationError(e.to_string()))?;
    if let Some(err) = parsed.blocked() {
        return Err(err);
    }

    let mut chunk = ChatCompletionChunk::text(model, parsed.text());
    chunk.id = parsed.response_id.clone().unwrap_or_default();
    chunk.created = unix_now();
    chunk.usage = parsed.usage();
    if let Some(reason) = parsed.finish_reason() {
        chunk = chunk.with_finish_reason(reason);
    }
    Ok(chunk)
}

/// Turn a byte stream of SSE events into a chunk stream.
///
/// The stream ends after the first error so consumers never see data past a
/// failure.
pub(crate) fn sse_chunk_stream<S, B>(body: S, model: String) -> ChatStream
where
    S: Stream<Item = LLMResult<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let events = Box::pin(body.eventsource());

    let stream = futures::stream::unfold((events, false), move |(mut events, failed)| {
        let model = model.clone();
        async move {
            if failed {
                return None;
            }
            loop {
                let item = match events.next().await? {
                    Ok(event) => {
                        if event.data.trim() == "[DONE]" {
                            continue;
                        }
                        parse_stream_event(&event.data, &model)
                    }
                    Err(EventStreamError::Transport(e)) => {
                        warn!(error = %e, "gemini stream interrupted");
                        Err(e)
                    }
                    Err(e) => Err(LLMError::SerializationError(e.to_string())),
                };
                let failed = item.is_err();
                return Some((item, (events, failed)));
            }
        }
    });

    Box::pin(stream)
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    fn supports_json_schema(&self) -> bool {
        true
    }

    async fn chat(&self, request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse> {
        let model = self.model_for(&request);
        let body = self.build_body(&request);
        debug!(
            model = %model,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "gemini generateContent"
        );

        let resp = self.post(&self.endpoint(&model, "generateContent"), &body).await?;
        let text = resp.text().await.map_err(Self::map_error)?;
        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| LLMError::SerializationError(e.to_string()))?;
        if let Some(err) = parsed.blocked() {
            return Err(err);
        }

        let choice = Choice {
            index: 0,
            message: ChatMessage::assistant(parsed.text()),
            finish_reason: parsed.finish_reason(),
        };

        Ok(ChatCompletionResponse {
            id: parsed.response_id.clone().unwrap_or_default(),
            object: "chat.completion".to_string(),
            created: unix_now(),
            model: parsed.model_version.clone().unwrap_or(model),
            usage: parsed.usage(),
            choices: vec![choice],
        })
    }

    async fn chat_stream(&self, request: ChatCompletionRequest) -> LLMResult<ChatStream> {
        let model = self.model_for(&request);
        let body = self.build_body(&request);
        debug!(model = %model, messages = request.messages.len(), "gemini streamGenerateContent");

        let url = format!("{}?alt=sse", self.endpoint(&model, "streamGenerateContent"));
        let resp = self.post(&url, &body).await?;
        let bytes = resp.bytes_stream().map(|r| r.map_err(Self::map_error));
        Ok(sse_chunk_stream(bytes, model))
    }
}
