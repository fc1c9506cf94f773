use flowwright_foundation::WorkflowError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Goal is empty; describe what the workflow should achieve")]
    EmptyGoal,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Workflow generation failed: {0}")]
    Generation(#[from] WorkflowError),

    #[error("Step {step} does not exist (the workflow has {len} steps)")]
    StepOutOfRange { step: usize, len: usize },

    #[error("Step {0} has no code snippet")]
    NoCodeSnippet(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialoguer error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

