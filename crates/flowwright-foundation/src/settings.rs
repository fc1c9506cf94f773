//! Application settings
//!
//! ```toml
//! [provider]
//! api_key = "${GEMINI_API_KEY}"
//! default_model = "gemini-2.5-flash"
//!
//! [assistant]
//! response_language = "English"
//! generation_temperature = 0.4
//! ```

use crate::llm::{GeminiConfig, GeminiProvider, LLMClient};
use crate::session::{Assistant, AssistantConfig};
use error_stack::{Report, ResultExt};
use flowwright_kernel::config;
use flowwright_kernel::{KernelError, KernelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: GeminiConfig,
    pub assistant: AssistantConfig,
}

impl Settings {
    /// Defaults overlaid with `GEMINI_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Load from `path` when given, else defaults; environment applies last.
    pub fn load(path: Option<&Path>) -> KernelResult<Self> {
        let settings = match path {
            Some(path) => config::load_config::<Settings>(path)
                .map_err(KernelError::from)
                .map_err(Report::new)
                .attach(format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        Ok(settings.with_env())
    }

    fn with_env(mut self) -> Self {
        if config::is_unresolved_env_ref(&self.provider.api_key) {
            self.provider.api_key.clear();
        }
        self.provider = self.provider.with_env_overrides();
        debug!(
            model = %self.provider.default_model,
            base_url = %self.provider.base_url,
            has_key = !self.provider.api_key.is_empty(),
            "settings resolved"
        );
        self
    }

    pub fn client(&self) -> KernelResult<LLMClient> {
        let provider = GeminiProvider::with_config(self.provider.clone())
            .map_err(KernelError::from)
            .map_err(Report::new)
            .attach("creating the Gemini provider")?;
        Ok(LLMClient::new(Arc::new(provider)))
    }

    pub fn assistant(&self) -> KernelResult<Assistant> {
        Ok(Assistant::new(self.client()?, self.assistant.clone()))
    }
}
