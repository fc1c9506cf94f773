//! LLM 模块
//! LLM Module
//!
//! 提供商抽象来自 `flowwright-kernel`，这里提供具体实现与高级 API
//! The provider abstraction lives in `flowwright-kernel`; this module adds
//! the concrete Gemini backend and the high-level client/session API.
//!
//! # 架构
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │  LLMClient  │───▶│ LLMProvider  │───▶│ GeminiProvider       │
//! │ (高级 API)  │    │   (trait)    │    │ (generateContent /   │
//! └─────────────┘    └──────────────┘    │  streamGenerateContent)
//!        │                               └──────────────────────┘
//!        ▼
//! ┌─────────────┐
//! │ ChatSession │  隐藏系统提示 + 多轮历史
//! │             │  hidden system prompt + multi-turn history
//! └─────────────┘
//! ```

pub mod client;
pub mod google;

pub use client::{ChatRequestBuilder, ChatSession, LLMClient};
pub use google::{GeminiConfig, GeminiProvider};

pub use flowwright_kernel::llm::*;
