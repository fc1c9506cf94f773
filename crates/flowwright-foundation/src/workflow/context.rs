use super::prompts;
use crate::llm::{ChatSession, LLMClient};
use flowwright_kernel::workflow::WorkflowStep;
use tracing::debug;

/// Deterministic text rendering of a workflow, used as hidden chat context.
pub fn render_context(steps: &[WorkflowStep]) -> String {
    steps
        .iter()
        .map(render_step)
        .collect::<Vec<_>>()
        .join("\n---\n")
}

fn render_step(step: &WorkflowStep) -> String {
    let mut out = format!(
        "Node {} ({}): {}\nPurpose: {}\n",
        step.title,
        step.node_type.label(),
        step.description,
        step.rationale
    );
    if let Some(cfg) = &step.llm_config {
        out.push_str(&format!("LLM config: {}\n", cfg.summary()));
    }
    if step.has_code() {
        out.push_str("Code logic: yes\n");
    }
    out
}

/// Factory for chat sessions grounded in a workflow
#[derive(Clone)]
pub struct WorkflowChat {
    client: LLMClient,
    language: String,
}

impl WorkflowChat {
    pub fn new(client: LLMClient) -> Self {
        Self {
            client,
            language: "简体中文".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// New session whose hidden instruction embeds `context`.
    pub fn create_session(&self, context: &str) -> ChatSession {
        let session = ChatSession::new(
            self.client.clone(),
            Some(prompts::chat_instruction(context, &self.language)),
        );
        debug!(session_id = %session.session_id(), context_len = context.len(), "chat session created");
        session
    }

    pub fn session_for(&self, steps: &[WorkflowStep]) -> ChatSession {
        self.create_session(&render_context(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowwright_kernel::workflow::{LlmNodeConfig, NodeType, StepId};

    fn step(title: &str, node_type: NodeType) -> WorkflowStep {
        WorkflowStep {
            id: StepId::generate(),
            title: title.into(),
            node_type,
            description: format!("{title} description"),
            rationale: format!("{title} rationale"),
            llm_config: None,
            code_snippet: None,
        }
    }

    #[test]
    fn renders_each_step_and_separator() {
        let mut summarize = step("Summarize", NodeType::Llm);
        summarize.llm_config = Some(LlmNodeConfig {
            temperature: Some(0.3),
            system_prompt: Some("You summarize news.".into()),
            ..Default::default()
        });
        let mut parse = step("Parse", NodeType::Code);
        parse.code_snippet = Some("JSON.parse(input)".into());

        let text = render_context(&[summarize, parse]);
        assert_eq!(
            text,
            "Node Summarize (大模型 (LLM)): Summarize description\n\
             Purpose: Summarize rationale\n\
             LLM config: temperature=0.3, system_prompt=\"You summarize news.\"\n\
             \n---\n\
             Node Parse (代码 (Code)): Parse description\n\
             Purpose: Parse rationale\n\
             Code logic: yes\n"
        );
    }

    #[test]
    fn empty_workflow_renders_empty_context() {
        assert_eq!(render_context(&[]), "");
    }
}
