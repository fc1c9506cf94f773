//! Output formatting module
//!
//! Workflows can be printed as annotated text, JSON (the format `copy`
//! reads back) or a table.

use crate::CliError;
use colored::Colorize;
use flowwright_foundation::workflow::WorkflowStep;

mod progress;
mod table;

pub use progress::ProgressBar;
pub use table::workflow_table;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for automation
    Json,
    /// Table-formatted output
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

pub fn render_workflow(steps: &[WorkflowStep], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(format_text(steps)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(steps)?),
        OutputFormat::Table => Ok(workflow_table(steps).to_string()),
    }
}

fn format_text(steps: &[WorkflowStep]) -> String {
    if steps.is_empty() {
        return "The model returned an empty workflow.".dimmed().to_string();
    }

    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!(
            "{} {}  {}\n",
            format!("{}.", i + 1).bold(),
            step.title.bold(),
            format!("[{}]", step.node_type).cyan()
        ));
        out.push_str(&format!("   {}\n", step.description));
        out.push_str(&format!("   {} {}\n", "Why:".dimmed(), step.rationale));

        if let Some(cfg) = &step.llm_config {
            out.push_str(&format!("   {} {}\n", "LLM:".yellow(), cfg.summary()));
        }
        if let Some(code) = step.code_snippet.as_deref().filter(|c| !c.trim().is_empty()) {
            out.push_str(&format!("   {}\n", "Code:".green()));
            for line in code.lines() {
                out.push_str(&format!("     {line}\n"));
            }
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowwright_foundation::workflow::{LlmNodeConfig, NodeType, StepId};

    fn steps() -> Vec<WorkflowStep> {
        vec![
            WorkflowStep {
                id: StepId::generate(),
                title: "Summarize".into(),
                node_type: NodeType::Llm,
                description: "Digest the articles".into(),
                rationale: "Readers skim".into(),
                llm_config: Some(LlmNodeConfig {
                    temperature: Some(0.3),
                    ..Default::default()
                }),
                code_snippet: None,
            },
            WorkflowStep {
                id: StepId::generate(),
                title: "Parse".into(),
                node_type: NodeType::Code,
                description: "Parse JSON".into(),
                rationale: "Structure".into(),
                llm_config: None,
                code_snippet: Some("const a = 1;\nreturn a;".into()),
            },
        ]
    }

    #[test]
    fn text_lists_every_step_with_details() {
        colored::control::set_override(false);
        let text = render_workflow(&steps(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("1. Summarize  [大模型 (LLM)]"));
        assert!(text.contains("LLM: temperature=0.3"));
        assert!(text.contains("2. Parse  [代码 (Code)]"));
        assert!(text.contains("     return a;"));
    }

    #[test]
    fn json_round_trips_for_copy() {
        let original = steps();
        let json = render_workflow(&original, OutputFormat::Json).unwrap();
        let parsed: Vec<WorkflowStep> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
        assert!(json.contains("\"nodeType\": \"代码 (Code)\""));
    }
}
