//! Deterministic [`LLMProvider`] double.
//!
//! Records every request and answers from FIFO queues filled by the
//! builder. Empty queues fall back to a canned reply.
//!
//! ```rust,ignore
//! let mock = MockLLMProvider::builder()
//!     .respond_with("[]")
//!     .stream_with_tokens(vec!["Hel", "lo"])
//!     .build();
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use flowwright_foundation::llm::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatStream,
    Choice, FinishReason, LLMError, LLMProvider, LLMResult,
};

#[derive(Default)]
struct MockState {
    chat_calls: Vec<ChatCompletionRequest>,
    stream_calls: Vec<ChatCompletionRequest>,
    chat_responses: VecDeque<LLMResult<ChatCompletionResponse>>,
    /// One inner `Vec` per `chat_stream` call
    stream_sequences: VecDeque<LLMResult<Vec<LLMResult<ChatCompletionChunk>>>>,
}

#[derive(Clone)]
pub struct MockLLMProvider {
    default_model: String,
    streaming: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockLLMProvider {
    pub fn builder() -> MockLLMProviderBuilder {
        MockLLMProviderBuilder::default()
    }

    pub fn chat_call_count(&self) -> usize {
        self.state.lock().expect("mock state mutex poisoned").chat_calls.len()
    }

    pub fn stream_call_count(&self) -> usize {
        self.state.lock().expect("mock state mutex poisoned").stream_calls.len()
    }

    pub fn chat_calls(&self) -> Vec<ChatCompletionRequest> {
        self.state.lock().expect("mock state mutex poisoned").chat_calls.clone()
    }

    pub fn stream_calls(&self) -> Vec<ChatCompletionRequest> {
        self.state.lock().expect("mock state mutex poisoned").stream_calls.clone()
    }

    pub fn was_called(&self) -> bool {
        let s = self.state.lock().expect("mock state mutex poisoned");
        !s.chat_calls.is_empty() || !s.stream_calls.is_empty()
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    fn supports_json_schema(&self) -> bool {
        true
    }

    async fn chat(&self, request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse> {
        let mut state = self.state.lock().expect("mock state mutex poisoned");
        state.chat_calls.push(request);
        state
            .chat_responses
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("This is a mock response.")))
    }

    async fn chat_stream(&self, request: ChatCompletionRequest) -> LLMResult<ChatStream> {
        let chunks = {
            let mut state = self.state.lock().expect("mock state mutex poisoned");
            state.stream_calls.push(request);
            state
                .stream_sequences
                .pop_front()
                .unwrap_or_else(|| Ok(token_chunks(vec!["mock stream token"])))?
        };
        Ok(Box::pin(stream::iter(chunks)))
    }
}

pub struct MockLLMProviderBuilder {
    default_model: String,
    streaming: bool,
    state: MockState,
}

impl Default for MockLLMProviderBuilder {
    fn default() -> Self {
        Self {
            default_model: "mock-model".to_string(),
            streaming: true,
            state: MockState::default(),
        }
    }
}

impl MockLLMProviderBuilder {
    /// Queue a successful chat reply with `content` as its text.
    pub fn respond_with(mut self, content: impl Into<String>) -> Self {
        self.state
            .chat_responses
            .push_back(Ok(text_response(content)));
        self
    }

    pub fn respond_with_error(mut self, error: LLMError) -> Self {
        self.state.chat_responses.push_back(Err(error));
        self
    }

    /// Queue one stream whose fragments are `tokens`, closed by a `Stop` chunk.
    pub fn stream_with_tokens(mut self, tokens: Vec<&str>) -> Self {
        self.state.stream_sequences.push_back(Ok(token_chunks(tokens)));
        self
    }

    /// Queue one stream that yields `tokens` and then `error`.
    pub fn stream_then_fail(mut self, tokens: Vec<&str>, error: LLMError) -> Self {
        let mut chunks: Vec<_> = tokens
            .into_iter()
            .map(|t| Ok(ChatCompletionChunk::text("mock-model", t)))
            .collect();
        chunks.push(Err(error));
        self.state.stream_sequences.push_back(Ok(chunks));
        self
    }

    /// Make the next `chat_stream` call fail before any fragment.
    pub fn stream_open_error(mut self, error: LLMError) -> Self {
        self.state.stream_sequences.push_back(Err(error));
        self
    }

    /// Report no streaming support; chat turns then go through `chat`.
    pub fn without_streaming(mut self) -> Self {
        self.streaming = false;
        self
    }

    pub fn build(self) -> MockLLMProvider {
        MockLLMProvider {
            default_model: self.default_model,
            streaming: self.streaming,
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

fn text_response(content: impl Into<String>) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "mock-response".to_string(),
        object: "chat.completion".to_string(),
        created: 0,
        model: "mock-model".to_string(),
        choices: vec![Choice {
            index: 0,
            message: ChatMessage::assistant(content),
            finish_reason: Some(FinishReason::Stop),
        }],
        usage: None,
    }
}

fn token_chunks(tokens: Vec<&str>) -> Vec<LLMResult<ChatCompletionChunk>> {
    let mut chunks: Vec<_> = tokens
        .into_iter()
        .map(|t| Ok(ChatCompletionChunk::text("mock-model", t)))
        .collect();
    chunks.push(Ok(
        ChatCompletionChunk::text("mock-model", "").with_finish_reason(FinishReason::Stop)
    ));
    chunks
}
