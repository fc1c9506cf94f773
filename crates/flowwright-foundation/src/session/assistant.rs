use super::state::{SessionEvent, SessionState, TransitionError};
use crate::llm::{ChatSession, LLMClient, LLMError, StreamBuffer};
use crate::workflow::{GoalIntake, WorkflowChat, WorkflowError, WorkflowGenerator, WorkflowStep};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// User-facing behaviour of the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Language every generated text and chat reply must use
    pub response_language: String,
    /// Temperature of the generation call; provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_temperature: Option<f32>,
    /// First transcript message after a new workflow
    pub greeting: String,
    /// Appended in place of a reply whose stream failed
    pub fallback_message: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            response_language: "简体中文".to_string(),
            generation_temperature: None,
            greeting: "工作流方案已生成。你可以问我任何节点的配置细节，例如“为什么这个 LLM 节点的温度要设得这么低？”或者“帮我改一下第三步的代码”。".to_string(),
            fallback_message: "抱歉，连接出现了问题，请稍后再试。".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum GenerateOutcome {
    /// Blank goal; nothing was sent
    Rejected,
    Busy(TransitionError),
    /// New batch with this many steps
    Generated(usize),
    /// Prior workflow kept
    Failed(WorkflowError),
}

#[derive(Debug)]
pub enum TurnOutcome {
    NoSession,
    EmptyMessage,
    Busy(TransitionError),
    Completed { reply: String },
    /// Fallback message was appended
    Failed { error: LLMError },
}

/// Drives generation and chat turns over one [`SessionState`]
pub struct Assistant {
    generator: WorkflowGenerator,
    chat: WorkflowChat,
    config: AssistantConfig,
    state: SessionState,
    session: Option<ChatSession>,
}

impl Assistant {
    pub fn new(client: LLMClient, config: AssistantConfig) -> Self {
        let mut generator =
            WorkflowGenerator::new(client.clone()).with_language(&config.response_language);
        if let Some(t) = config.generation_temperature {
            generator = generator.with_temperature(t);
        }
        let chat = WorkflowChat::new(client).with_language(&config.response_language);
        Self::from_parts(generator, chat, config)
    }

    pub fn from_parts(
        generator: WorkflowGenerator,
        chat: WorkflowChat,
        config: AssistantConfig,
    ) -> Self {
        Self {
            generator,
            chat,
            config,
            state: SessionState::new(),
            session: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn workflow(&self) -> &[WorkflowStep] {
        &self.state.workflow
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Generate a new workflow for `raw_goal`.
    ///
    /// On success the batch replaces the previous one, a fresh chat session
    /// is grounded in it and the transcript restarts with the greeting.
    pub async fn generate_workflow(&mut self, raw_goal: impl Into<String>) -> GenerateOutcome {
        let Some(goal) = GoalIntake::accept(raw_goal) else {
            debug!("blank goal ignored");
            return GenerateOutcome::Rejected;
        };
        if let Err(e) = advance(
            &mut self.state,
            SessionEvent::BeginGeneration { goal: goal.clone() },
        ) {
            return GenerateOutcome::Busy(e);
        }

        info!(goal = %goal, "generating workflow");
        match self.generator.generate_workflow(&goal).await {
            Ok(steps) => {
                let count = steps.len();
                self.session = Some(self.chat.session_for(&steps));
                let ready = SessionEvent::WorkflowReady {
                    steps,
                    greeting: self.config.greeting.clone(),
                };
                if let Err(e) = advance(&mut self.state, ready) {
                    warn!(error = %e, "workflow ready out of order");
                }
                GenerateOutcome::Generated(count)
            }
            Err(e) => {
                error!(error = %e, "workflow generation failed");
                if let Err(t) = advance(&mut self.state, SessionEvent::GenerationFailed) {
                    warn!(error = %t, "generation failure out of order");
                }
                GenerateOutcome::Failed(e)
            }
        }
    }

    /// Send one chat turn, calling `on_update` after every state change.
    ///
    /// The last transcript message grows by prefix while fragments arrive.
    /// A failed stream leaves exactly one fallback message and nothing in
    /// the session history.
    pub async fn send_message<F>(&mut self, text: impl Into<String>, mut on_update: F) -> TurnOutcome
    where
        F: FnMut(&SessionState),
    {
        let Some(session) = self.session.as_mut() else {
            return TurnOutcome::NoSession;
        };
        let text = text.into();
        if text.trim().is_empty() {
            return TurnOutcome::EmptyMessage;
        }
        if let Err(e) = advance(&mut self.state, SessionEvent::BeginTurn { text: text.clone() }) {
            return TurnOutcome::Busy(e);
        }
        on_update(&self.state);

        let mut buffer = StreamBuffer::new();
        let failure = match session.send_stream(text.clone()).await {
            Err(e) => Some(e),
            Ok(mut stream) => {
                let mut failure = None;
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(fragment) => {
                            buffer.push(&fragment);
                            if let Err(e) =
                                advance(&mut self.state, SessionEvent::Fragment { text: fragment })
                            {
                                warn!(error = %e, "fragment out of order");
                            }
                            on_update(&self.state);
                        }
                        Err(e) => {
                            failure = Some(e);
                            break;
                        }
                    }
                }
                failure
            }
        };

        match failure {
            None => {
                debug!(fragments = buffer.fragments(), "chat turn completed");
                let reply = buffer.into_string();
                if reply.is_empty() {
                    warn!("provider streamed an empty reply; turn not kept in history");
                } else {
                    session.commit_turn(text, reply.clone());
                }
                if let Err(e) = advance(&mut self.state, SessionEvent::TurnCompleted) {
                    warn!(error = %e, "turn completion out of order");
                }
                on_update(&self.state);
                TurnOutcome::Completed { reply }
            }
            Some(error) => {
                warn!(error = %error, partial_len = buffer.as_str().len(), "chat stream failed");
                let failed = SessionEvent::TurnFailed {
                    fallback: self.config.fallback_message.clone(),
                };
                if let Err(e) = advance(&mut self.state, failed) {
                    warn!(error = %e, "turn failure out of order");
                }
                on_update(&self.state);
                TurnOutcome::Failed { error }
            }
        }
    }
}

fn advance(state: &mut SessionState, event: SessionEvent) -> Result<(), TransitionError> {
    match std::mem::take(state).apply(event) {
        Ok(next) => {
            *state = next;
            Ok(())
        }
        Err((unchanged, e)) => {
            *state = unchanged;
            Err(e)
        }
    }
}
