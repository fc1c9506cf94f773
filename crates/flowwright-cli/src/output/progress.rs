//! Progress indicators for long-running operations

use indicatif::{ProgressBar as IndicatifProgressBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Spinner shown while waiting on the provider; hidden when stderr is not a terminal.
pub struct ProgressBar {
    inner: IndicatifProgressBar,
}

impl ProgressBar {
    pub fn new_spinner(message: &str) -> Self {
        let pb = IndicatifProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(100));
        let style = IndicatifStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| IndicatifStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        Self { inner: pb }
    }

    pub fn finish_with_message(&self, message: &str) {
        self.inner.finish_with_message(message.to_string());
    }

    pub fn abandon_with_message(&self, message: &str) {
        self.inner.abandon_with_message(message.to_string());
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        if !self.inner.is_finished() {
            self.inner.finish_and_clear();
        }
    }
}
