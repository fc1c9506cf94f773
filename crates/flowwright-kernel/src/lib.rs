//! Flowwright kernel
//!
//! Provider-agnostic building blocks shared by the rest of the workspace:
//!
//! - [`llm`]: chat request/response types, the [`llm::LLMProvider`] trait and
//!   streaming primitives
//! - [`workflow`]: the workflow domain model (steps, node types, LLM node
//!   parameters)
//! - [`structured_output`]: schema declaration for JSON-constrained generation
//! - [`config`]: multi-format configuration loading with env substitution
//! - [`error`]: the crate-level [`error::KernelError`]

// llm module
pub mod llm;

// workflow domain model
pub mod workflow;

// structured output
pub mod structured_output;

// config module
#[cfg(feature = "config")]
pub mod config;

// error module
pub mod error;

pub use error::{KernelError, KernelResult};
pub use structured_output::StructuredOutput;
