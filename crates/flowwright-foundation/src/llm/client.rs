//! LLM Client - 高级 LLM 交互封装
//!
//! 提供便捷的请求构建、结构化输出与多轮会话 API
//! Request building, schema-constrained generation and multi-turn sessions.

use flowwright_kernel::StructuredOutput;
use flowwright_kernel::llm::*;
use std::sync::Arc;
use tracing::debug;

/// LLM 客户端
///
/// # 示例
///
/// ```rust,ignore
/// use flowwright_foundation::llm::{GeminiProvider, LLMClient};
/// use std::sync::Arc;
///
/// let client = LLMClient::new(Arc::new(GeminiProvider::from_env()?));
/// let response = client
///     .chat()
///     .system("You are a helpful assistant.")
///     .user("Hello!")
///     .send()
///     .await?;
/// ```
#[derive(Clone)]
pub struct LLMClient {
    provider: Arc<dyn LLMProvider>,
}

impl LLMClient {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// 创建 Chat 请求构建器，使用提供商的默认模型
    pub fn chat(&self) -> ChatRequestBuilder {
        ChatRequestBuilder::new(self.provider.clone(), self.provider.default_model())
    }

    /// Chat builder whose response is constrained to `T`'s schema.
    ///
    /// Parsing is left to the caller so it can tell malformed output apart
    /// from transport failures.
    pub fn generate_structured<T: StructuredOutput>(&self) -> ChatRequestBuilder {
        if !self.provider.supports_json_schema() {
            debug!(
                provider = self.provider.name(),
                "provider ignores response schemas; relying on prompt only"
            );
        }
        self.chat().json_schema(T::schema())
    }
}

/// Chat 请求构建器
pub struct ChatRequestBuilder {
    provider: Arc<dyn LLMProvider>,
    request: ChatCompletionRequest,
}

impl ChatRequestBuilder {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            request: ChatCompletionRequest::new(model),
        }
    }

    /// 添加系统消息
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.request.messages.push(ChatMessage::system(content));
        self
    }

    /// 添加用户消息
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.request.messages.push(ChatMessage::user(content));
        self
    }

    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.request.messages.push(ChatMessage::assistant(content));
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.request.messages.extend(messages);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.request.temperature = Some(temp);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.request.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.request.max_tokens = Some(tokens);
        self
    }

    /// 约束响应为给定 JSON Schema
    pub fn json_schema(mut self, schema: serde_json::Value) -> Self {
        self.request.response_format = Some(ResponseFormat::json_schema(schema));
        self
    }

    pub fn request(&self) -> &ChatCompletionRequest {
        &self.request
    }

    /// 发送请求
    pub async fn send(self) -> LLMResult<ChatCompletionResponse> {
        self.provider.chat(self.request).await
    }

    /// 发送流式请求
    pub async fn send_stream(mut self) -> LLMResult<ChatStream> {
        self.request.stream = Some(true);
        self.provider.chat_stream(self.request).await
    }
}

// ============================================================================
// 会话管理
// ============================================================================

/// 对话会话
///
/// 系统提示在创建时固定，之后只能追加对话历史。
/// The system prompt is fixed at creation; only the history grows.
pub struct ChatSession {
    session_id: uuid::Uuid,
    client: LLMClient,
    system_prompt: Option<String>,
    messages: Vec<ChatMessage>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatSession {
    pub fn new(client: LLMClient, system_prompt: Option<String>) -> Self {
        Self {
            session_id: uuid::Uuid::now_v7(),
            client,
            system_prompt,
            messages: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn session_id(&self) -> uuid::Uuid {
        self.session_id
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    fn turn_request(&self, content: String) -> ChatRequestBuilder {
        let mut builder = self.client.chat();
        if let Some(ref system) = self.system_prompt {
            builder = builder.system(system.clone());
        }
        builder
            .messages(self.messages.iter().cloned())
            .user(content)
    }

    /// Open a streamed turn.
    ///
    /// History is not touched; call [`commit_turn`](Self::commit_turn) with
    /// the accumulated reply once the stream has ended cleanly. Providers
    /// that cannot stream are asked once and the whole reply arrives as a
    /// single fragment.
    pub async fn send_stream(&self, content: impl Into<String>) -> LLMResult<TextStream> {
        let content = content.into();
        debug!(
            session_id = %self.session_id,
            history = self.messages.len(),
            "opening streamed turn"
        );
        if !self.client.provider().supports_streaming() {
            let response = self.turn_request(content).send().await?;
            let text = response.content().unwrap_or_default().to_string();
            return Ok(Box::pin(futures::stream::once(async move { Ok(text) })));
        }
        let raw = self.turn_request(content).send_stream().await?;
        Ok(text_fragments(raw))
    }

    pub fn commit_turn(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(reply));
    }

    /// 获取消息历史
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
