//! CLI command implementations

pub mod chat;
pub mod copy;
pub mod generate;

use crate::CliError;
use flowwright_foundation::{Assistant, Settings};
use std::path::Path;

/// Settings from `--config` (or defaults) plus `GEMINI_*` overrides.
pub(crate) fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    Settings::load(config).map_err(|report| CliError::ConfigError(format!("{report:?}")))
}

pub(crate) fn build_assistant(settings: &Settings) -> Result<Assistant, CliError> {
    settings
        .assistant()
        .map_err(|report| CliError::ConfigError(format!("{report:?}")))
}
