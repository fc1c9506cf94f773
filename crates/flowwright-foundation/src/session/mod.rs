//! 会话状态机
//! Session state machine
//!
//! ```text
//! Idle ──BeginGeneration──▶ GeneratingWorkflow ──WorkflowReady / GenerationFailed──▶ Idle
//! Idle ──BeginTurn──▶ Chatting ──Fragment*──▶ Chatting ──TurnCompleted / TurnFailed──▶ Idle
//! ```

mod assistant;
mod state;

pub use assistant::{Assistant, AssistantConfig, GenerateOutcome, TurnOutcome};
pub use state::{
    AppStatus, MessageRole, SessionEvent, SessionState, TranscriptMessage, TransitionError,
};
