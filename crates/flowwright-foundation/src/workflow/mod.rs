//! 工作流生成与上下文对话
//! Workflow generation and context-grounded chat
//!
//! - [`GoalIntake`]: 过滤空目标 / rejects blank goals
//! - [`WorkflowGenerator`]: 结构化生成 / schema-constrained generation
//! - [`WorkflowChat`]: 以工作流为隐藏上下文的会话 / sessions grounded in a plan

mod context;
mod generator;
mod intake;
pub mod prompts;

pub use context::{WorkflowChat, render_context};
pub use generator::{WorkflowError, WorkflowGenerator};
pub use intake::{Goal, GoalIntake};

pub use flowwright_kernel::workflow::*;
