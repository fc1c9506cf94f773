use super::intake::Goal;
use super::prompts;
use crate::llm::{LLMClient, LLMError};
use flowwright_kernel::workflow::{StepDraft, StepId, WorkflowStep};
use tracing::{debug, info, warn};

/// Workflow generation errors
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow generation request failed: {0}")]
    Provider(#[from] LLMError),
    #[error("workflow response is not a valid step list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Turns a goal into an ordered batch of workflow steps
#[derive(Clone)]
pub struct WorkflowGenerator {
    client: LLMClient,
    language: String,
    temperature: Option<f32>,
}

impl WorkflowGenerator {
    pub fn new(client: LLMClient) -> Self {
        Self {
            client,
            language: "简体中文".to_string(),
            temperature: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn client(&self) -> &LLMClient {
        &self.client
    }

    /// Single schema-constrained call; no retry.
    ///
    /// Empty response text is a valid empty plan.
    pub async fn generate_workflow(&self, goal: &Goal) -> Result<Vec<WorkflowStep>, WorkflowError> {
        let mut builder = self
            .client
            .generate_structured::<Vec<StepDraft>>()
            .system(prompts::architect_instruction())
            .user(prompts::generation_prompt(goal.as_str(), &self.language));
        if let Some(t) = self.temperature {
            builder = builder.temperature(t);
        }

        let response = builder.send().await?;
        let Some(text) = response.content() else {
            info!("generation returned no text; treating as an empty workflow");
            return Ok(Vec::new());
        };

        let steps = parse_steps(text)?;
        for step in &steps {
            for violation in step.config_violations() {
                warn!(step = %step.id, title = %step.title, %violation, "unusual step configuration");
            }
        }
        info!(steps = steps.len(), "workflow generated");
        Ok(steps)
    }
}

/// Parse the response body and stamp every draft with a fresh id.
pub(crate) fn parse_steps(text: &str) -> Result<Vec<WorkflowStep>, serde_json::Error> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let drafts: Vec<StepDraft> = serde_json::from_str(body)?;
    debug!(drafts = drafts.len(), "parsed workflow drafts");
    Ok(drafts
        .into_iter()
        .map(|d| d.into_step(StepId::generate()))
        .collect())
}

// Some models wrap JSON in ```json fences even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        assert_eq!(strip_code_fence("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn parse_stamps_distinct_ids_for_identical_drafts() {
        let draft = r#"{"title":"Same","nodeType":"其他","description":"d","rationale":"r"}"#;
        let steps = parse_steps(&format!("[{draft},{draft}]")).unwrap();
        assert_eq!(steps.len(), 2);
        assert_ne!(steps[0].id, steps[1].id);
        assert_eq!(steps[0].title, steps[1].title);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let err = parse_steps(r#"[{"title":"x","nodeType":"其他"}]"#).unwrap_err();
        assert!(err.is_data());
    }
}
