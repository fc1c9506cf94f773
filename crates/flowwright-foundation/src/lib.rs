//! Flowwright foundation
//!
//! 工作流架构助手的核心：目标拆解、结构化生成与基于工作流上下文的流式对话
//! Core of the workflow-architect assistant: goal decomposition, schema
//! constrained generation and streamed chat grounded in the generated plan.
//!
//! ```text
//! Goal Intake ──▶ WorkflowGenerator ──▶ WorkflowChat / ChatSession
//!      │                  │                        │
//!      └──────────────── Assistant (SessionState reducer) ──────────┘
//! ```

// llm module
pub mod llm;

// workflow module
pub mod workflow;

// session state machine
pub mod session;

// settings
pub mod settings;

pub use llm::{GeminiConfig, GeminiProvider, LLMClient};
pub use session::{AppStatus, Assistant, AssistantConfig, SessionState};
pub use settings::Settings;
pub use workflow::{GoalIntake, WorkflowChat, WorkflowError, WorkflowGenerator};
