//! Session state and its reducer
//!
//! Every transition goes through [`SessionState::apply`], which never
//! mutates in place: callers swap in the returned state.

use crate::workflow::{Goal, WorkflowStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    #[default]
    Idle,
    GeneratingWorkflow,
    Chatting,
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppStatus::Idle => write!(f, "idle"),
            AppStatus::GeneratingWorkflow => write!(f, "generating workflow"),
            AppStatus::Chatting => write!(f, "chatting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry of the visible transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Inputs of the reducer
#[derive(Debug, Clone)]
pub enum SessionEvent {
    BeginGeneration { goal: Goal },
    /// New batch; the transcript restarts with `greeting`.
    WorkflowReady { steps: Vec<WorkflowStep>, greeting: String },
    GenerationFailed,
    /// User message plus an empty assistant placeholder.
    BeginTurn { text: String },
    /// Text appended to the in-progress assistant message.
    Fragment { text: String },
    TurnCompleted,
    /// Drops the partial reply and appends `fallback` instead.
    TurnFailed { fallback: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("assistant is busy ({0})")]
    Busy(AppStatus),
    #[error("no workflow generation in progress")]
    NotGenerating,
    #[error("no chat turn in progress")]
    NotChatting,
}

/// Plain-data view of one assistant session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub goal: Option<Goal>,
    pub workflow: Vec<WorkflowStep>,
    pub messages: Vec<TranscriptMessage>,
    pub status: AppStatus,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.status == AppStatus::Idle
    }

    /// Text of the in-progress (or last) assistant message
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
    }

    /// Apply one event. A rejected event hands the state back unchanged
    /// together with the reason.
    pub fn apply(mut self, event: SessionEvent) -> Result<Self, (Self, TransitionError)> {
        if let Err(e) = self.check(&event) {
            return Err((self, e));
        }
        match event {
            SessionEvent::BeginGeneration { goal } => {
                self.goal = Some(goal);
                self.status = AppStatus::GeneratingWorkflow;
            }
            SessionEvent::WorkflowReady { steps, greeting } => {
                self.workflow = steps;
                self.messages = vec![TranscriptMessage::assistant(greeting)];
                self.status = AppStatus::Idle;
            }
            SessionEvent::GenerationFailed | SessionEvent::TurnCompleted => {
                self.status = AppStatus::Idle;
            }
            SessionEvent::BeginTurn { text } => {
                self.messages.push(TranscriptMessage::user(text));
                self.messages.push(TranscriptMessage::assistant(""));
                self.status = AppStatus::Chatting;
            }
            SessionEvent::Fragment { text } => {
                if let Some(tail) = self.messages.last_mut() {
                    tail.content.push_str(&text);
                }
            }
            SessionEvent::TurnFailed { fallback } => {
                if self.last_reply().is_some() {
                    self.messages.pop();
                }
                self.messages.push(TranscriptMessage::assistant(fallback));
                self.status = AppStatus::Idle;
            }
        }
        Ok(self)
    }

    fn check(&self, event: &SessionEvent) -> Result<(), TransitionError> {
        match event {
            SessionEvent::BeginGeneration { .. } | SessionEvent::BeginTurn { .. } => {
                self.require_idle()
            }
            SessionEvent::WorkflowReady { .. } | SessionEvent::GenerationFailed => {
                self.require(AppStatus::GeneratingWorkflow, TransitionError::NotGenerating)
            }
            SessionEvent::Fragment { .. } => {
                self.require(AppStatus::Chatting, TransitionError::NotChatting)?;
                // the tail must be the in-progress reply
                match self.last_reply() {
                    Some(_) => Ok(()),
                    None => Err(TransitionError::NotChatting),
                }
            }
            SessionEvent::TurnCompleted | SessionEvent::TurnFailed { .. } => {
                self.require(AppStatus::Chatting, TransitionError::NotChatting)
            }
        }
    }

    fn require_idle(&self) -> Result<(), TransitionError> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(TransitionError::Busy(self.status))
        }
    }

    fn require(&self, status: AppStatus, err: TransitionError) -> Result<(), TransitionError> {
        if self.status == status { Ok(()) } else { Err(err) }
    }
}
