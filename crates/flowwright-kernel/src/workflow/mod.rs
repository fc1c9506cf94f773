//! Workflow domain model
//!
//! A workflow is an ordered batch of [`WorkflowStep`]s describing how to
//! assemble a bot on a no-code platform. Steps are produced in one batch by
//! the generator and never mutated afterwards.

mod step;

pub use step::{ConfigViolation, LlmNodeConfig, NodeType, StepDraft, StepId, WorkflowStep};
