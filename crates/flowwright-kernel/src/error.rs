//! Crate-level error types for `flowwright-kernel`.
//!
//! [`KernelError`] composes the errors of every sub-module and is meant to be
//! carried inside an [`error_stack::Report`] so callers can attach context
//! while propagating:
//!
//! ```rust,ignore
//! use error_stack::ResultExt;
//! use flowwright_kernel::{KernelError, KernelResult};
//!
//! fn read_settings(path: &str) -> KernelResult<String> {
//!     std::fs::read_to_string(path)
//!         .map_err(KernelError::from)
//!         .map_err(error_stack::Report::new)
//!         .attach(format!("reading {path}"))
//! }
//! ```

use crate::llm::LLMError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// A provider call failed.
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    /// A configuration-related error (requires the `config` feature).
    #[cfg(feature = "config")]
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal / untyped error described by a message string.
    #[error("{0}")]
    Internal(String),
}

/// Convenience result alias using [`error_stack::Report`].
pub type KernelResult<T> = Result<T, error_stack::Report<KernelError>>;
