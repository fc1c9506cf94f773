use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::structured_output::StructuredOutput;

/// Unique identifier of a workflow step
///
/// Generated locally at creation time from a UUID v7, so ids stay distinct
/// within a batch and across rapid successive batches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn generate() -> Self {
        Self(format!("step-{}", uuid::Uuid::now_v7()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node kinds offered by Coze/Dify-style builders
///
/// The wire labels are the builder's own vocabulary; short ASCII aliases are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "大模型 (LLM)", alias = "llm", alias = "LLM")]
    Llm,
    #[serde(rename = "代码 (Code)", alias = "code", alias = "Code")]
    Code,
    #[serde(rename = "API 请求", alias = "api", alias = "api_request", alias = "API")]
    ApiRequest,
    #[serde(rename = "判断逻辑 (Condition)", alias = "condition", alias = "Condition")]
    Condition,
    #[serde(rename = "数据库", alias = "database", alias = "Database")]
    Database,
    #[serde(rename = "知识库", alias = "knowledge_base", alias = "KnowledgeBase")]
    KnowledgeBase,
    #[serde(rename = "其他", alias = "other", alias = "Other")]
    Other,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Llm,
        NodeType::Code,
        NodeType::ApiRequest,
        NodeType::Condition,
        NodeType::Database,
        NodeType::KnowledgeBase,
        NodeType::Other,
    ];

    /// Label used on the wire and in the schema enum
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Llm => "大模型 (LLM)",
            NodeType::Code => "代码 (Code)",
            NodeType::ApiRequest => "API 请求",
            NodeType::Condition => "判断逻辑 (Condition)",
            NodeType::Database => "数据库",
            NodeType::KnowledgeBase => "知识库",
            NodeType::Other => "其他",
        }
    }

    pub fn is_llm(&self) -> bool {
        matches!(self, NodeType::Llm)
    }

    pub fn is_code(&self) -> bool {
        matches!(self, NodeType::Code)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recommended parameters for an LLM node. Absent fields mean "provider default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmNodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl LlmNodeConfig {
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
            && self.system_prompt.is_none()
    }

    /// One-line rendering, e.g. `temperature=0.3, system_prompt="Summarize"`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(model) = &self.model {
            parts.push(format!("model={model}"));
        }
        if let Some(t) = self.temperature {
            parts.push(format!("temperature={t}"));
        }
        if let Some(p) = self.top_p {
            parts.push(format!("top_p={p}"));
        }
        if let Some(prompt) = &self.system_prompt {
            parts.push(format!("system_prompt=\"{}\"", prompt.replace('\n', " ")));
        }
        if parts.is_empty() {
            "provider defaults".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Sampling parameters outside the expected 0.0–1.0 range.
    pub fn out_of_range(&self) -> Vec<(&'static str, f64)> {
        [("temperature", self.temperature), ("top_p", self.top_p)]
            .into_iter()
            .filter_map(|(name, v)| v.filter(|v| !(0.0..=1.0).contains(v)).map(|v| (name, v)))
            .collect()
    }
}

/// A step as returned by the generation service, before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDraft {
    pub title: String,
    pub node_type: NodeType,
    pub description: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_config: Option<LlmNodeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl StepDraft {
    pub fn into_step(self, id: StepId) -> WorkflowStep {
        WorkflowStep {
            id,
            title: self.title,
            node_type: self.node_type,
            description: self.description,
            rationale: self.rationale,
            llm_config: self.llm_config,
            code_snippet: self.code_snippet,
        }
    }
}

impl StructuredOutput for Vec<StepDraft> {
    fn schema() -> serde_json::Value {
        let node_types: Vec<&str> = NodeType::ALL.iter().map(NodeType::label).collect();
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": {
                        "type": "STRING",
                        "description": "Node name, e.g. user intent recognition"
                    },
                    "nodeType": {
                        "type": "STRING",
                        "enum": node_types,
                        "description": "Node type in the bot builder workflow"
                    },
                    "description": {
                        "type": "STRING",
                        "description": "Detailed description of what the node does"
                    },
                    "rationale": {
                        "type": "STRING",
                        "description": "Why the workflow needs this node and which problem it solves"
                    },
                    "llmConfig": {
                        "type": "OBJECT",
                        "properties": {
                            "model": {
                                "type": "STRING",
                                "description": "Recommended model, e.g. Gemini 1.5 Pro or GPT-4o"
                            },
                            "temperature": {
                                "type": "NUMBER",
                                "description": "Recommended temperature (0.0 - 1.0)"
                            },
                            "topP": {
                                "type": "NUMBER",
                                "description": "Recommended top-p (0.0 - 1.0)"
                            },
                            "systemPrompt": {
                                "type": "STRING",
                                "description": "Core system prompt suggestion for the LLM node"
                            }
                        },
                        "nullable": true,
                        "description": "Only filled when the node type is the LLM node"
                    },
                    "codeSnippet": {
                        "type": "STRING",
                        "nullable": true,
                        "description": "For code nodes, a concrete JavaScript or Python implementation (polling, data processing)"
                    }
                },
                "required": ["title", "nodeType", "description", "rationale"]
            }
        })
    }
}

/// Deviations from the "config only on matching node type" convention.
///
/// The generator does not enforce these; they are reported so callers can
/// surface or log them.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigViolation {
    LlmConfigOnNonLlmNode(NodeType),
    CodeSnippetOnNonCodeNode(NodeType),
    ParameterOutOfRange { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigViolation::LlmConfigOnNonLlmNode(t) => {
                write!(f, "llmConfig present on a {t} node")
            }
            ConfigViolation::CodeSnippetOnNonCodeNode(t) => {
                write!(f, "codeSnippet present on a {t} node")
            }
            ConfigViolation::ParameterOutOfRange { name, value } => {
                write!(f, "{name}={value} outside 0.0-1.0")
            }
        }
    }
}

/// One node of a generated workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: StepId,
    pub title: String,
    pub node_type: NodeType,
    pub description: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_config: Option<LlmNodeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl WorkflowStep {
    pub fn has_code(&self) -> bool {
        self.code_snippet.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    pub fn config_violations(&self) -> Vec<ConfigViolation> {
        let mut out = Vec::new();
        if let Some(cfg) = &self.llm_config {
            if !self.node_type.is_llm() && !cfg.is_empty() {
                out.push(ConfigViolation::LlmConfigOnNonLlmNode(self.node_type));
            }
            out.extend(
                cfg.out_of_range()
                    .into_iter()
                    .map(|(name, value)| ConfigViolation::ParameterOutOfRange { name, value }),
            );
        }
        if self.has_code() && !self.node_type.is_code() {
            out.push(ConfigViolation::CodeSnippetOnNonCodeNode(self.node_type));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_wire_labels_and_aliases() {
        let t: NodeType = serde_json::from_str("\"大模型 (LLM)\"").unwrap();
        assert_eq!(t, NodeType::Llm);
        let t: NodeType = serde_json::from_str("\"knowledge_base\"").unwrap();
        assert_eq!(t, NodeType::KnowledgeBase);
        assert_eq!(serde_json::to_string(&NodeType::ApiRequest).unwrap(), "\"API 请求\"");
        assert!(serde_json::from_str::<NodeType>("\"webhook\"").is_err());
    }

    #[test]
    fn schema_enumerates_every_node_type() {
        let schema = <Vec<StepDraft>>::schema();
        let labels = schema["items"]["properties"]["nodeType"]["enum"].as_array().unwrap();
        assert_eq!(labels.len(), NodeType::ALL.len());
        assert_eq!(
            schema["items"]["required"],
            json!(["title", "nodeType", "description", "rationale"])
        );
    }

    #[test]
    fn draft_parses_camel_case_fields() {
        let raw = r#"{
            "title": "Summarize",
            "nodeType": "大模型 (LLM)",
            "description": "Summarize articles",
            "rationale": "Readers want a digest",
            "llmConfig": {"temperature": 0.3, "topP": 0.8, "systemPrompt": "You summarize news."}
        }"#;
        let draft: StepDraft = serde_json::from_str(raw).unwrap();
        let cfg = draft.llm_config.clone().unwrap();
        assert_eq!(cfg.top_p, Some(0.8));
        assert_eq!(cfg.system_prompt.as_deref(), Some("You summarize news."));
        assert!(draft.code_snippet.is_none());

        let step = draft.into_step(StepId::generate());
        assert!(step.id.as_str().starts_with("step-"));
        assert!(step.config_violations().is_empty());
    }

    #[test]
    fn summary_lists_present_fields_only() {
        let cfg = LlmNodeConfig {
            temperature: Some(0.3),
            system_prompt: Some("line one\nline two".into()),
            ..Default::default()
        };
        assert_eq!(cfg.summary(), "temperature=0.3, system_prompt=\"line one line two\"");
        assert_eq!(LlmNodeConfig::default().summary(), "provider defaults");
    }

    #[test]
    fn violations_are_reported_not_rejected() {
        let step = WorkflowStep {
            id: StepId::generate(),
            title: "Fetch".into(),
            node_type: NodeType::ApiRequest,
            description: "GET feed".into(),
            rationale: "source data".into(),
            llm_config: Some(LlmNodeConfig {
                temperature: Some(1.4),
                ..Default::default()
            }),
            code_snippet: Some("fetch(url)".into()),
        };
        let v = step.config_violations();
        assert_eq!(v.len(), 3);
        assert!(v.contains(&ConfigViolation::LlmConfigOnNonLlmNode(NodeType::ApiRequest)));
        assert!(v.contains(&ConfigViolation::ParameterOutOfRange { name: "temperature", value: 1.4 }));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = StepId::generate();
        let b = StepId::generate();
        assert_ne!(a, b);
    }
}
