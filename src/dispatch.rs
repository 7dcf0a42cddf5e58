//! Tool-call dispatch loop
//!
//! One turn alternates between asking the model backend for a response and
//! executing the tools it requests:
//! 1. Send the transcript and advertised tool schemas to the backend
//! 2. On a plain answer, record it and stop
//! 3. On tool calls, record the request, run each call in order, append one
//!    tool result per call, and go back to 1
//!
//! The loop is bounded by a round cap and by per-round and per-turn deadlines.

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub mod testing;

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService, ToolCall, ToolDescriptor};
use crate::notifier::Notifier;
use crate::session::Session;
use crate::tools::{ToolContext, ToolInput, ToolOutput, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::Instrument;

pub const DEFAULT_MAX_ROUNDS: u32 = 8;
pub const DEFAULT_ROUND_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(180);

/// Bounds applied to every turn
#[derive(Debug, Clone, Copy)]
pub struct DispatchLimits {
    /// Maximum backend calls per turn
    pub max_rounds: u32,
    /// Deadline for a single backend call, retries included
    pub round_timeout: Duration,
    /// Deadline for the whole turn, tool execution included
    pub turn_timeout: Duration,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            round_timeout: DEFAULT_ROUND_TIMEOUT,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("model kept requesting tools after {rounds} rounds")]
    ToolLoopExceeded { rounds: u32 },
    #[error("model backend error: {0}")]
    Backend(#[from] LlmError),
    #[error("turn timed out after {0:?}")]
    TurnTimeout(Duration),
}

/// Dispatch loop state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Next backend call is round `round` (1-based)
    AwaitingModel { round: u32 },
    /// Final answer produced
    Done { text: String },
}

/// Runs turns against a backend with a fixed tool registry.
///
/// Shared across requests; each turn brings its own [`Session`].
pub struct Dispatcher {
    llm: Arc<dyn LlmService>,
    tools: Arc<ToolRegistry>,
    notifier: Arc<dyn Notifier>,
    limits: DispatchLimits,
}

impl Dispatcher {
    pub fn new(
        llm: Arc<dyn LlmService>,
        tools: Arc<ToolRegistry>,
        notifier: Arc<dyn Notifier>,
        limits: DispatchLimits,
    ) -> Self {
        Self {
            llm,
            tools,
            notifier,
            limits,
        }
    }

    /// Run one turn to completion, returning the final answer text.
    ///
    /// On error the session keeps everything appended so far.
    pub async fn run_turn(&self, session: &mut Session) -> Result<String, DispatchError> {
        let turn_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("turn", turn_id = %turn_id);
        let ctx = ToolContext::new(turn_id, self.notifier.clone());
        let turn_timeout = self.limits.turn_timeout;

        async move {
            match timeout(turn_timeout, self.drive(session, &ctx)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout_ms = %turn_timeout.as_millis(), "Turn deadline exceeded");
                    Err(DispatchError::TurnTimeout(turn_timeout))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, session: &mut Session, ctx: &ToolContext) -> Result<String, DispatchError> {
        let schemas = self.tools.schemas();
        let mut state = LoopState::AwaitingModel { round: 1 };

        loop {
            state = match state {
                LoopState::Done { text } => return Ok(text),
                LoopState::AwaitingModel { round } if round > self.limits.max_rounds => {
                    tracing::warn!(max_rounds = self.limits.max_rounds, "Tool loop exceeded round cap");
                    return Err(DispatchError::ToolLoopExceeded {
                        rounds: self.limits.max_rounds,
                    });
                }
                LoopState::AwaitingModel { round } => {
                    tracing::debug!(round, messages = session.len(), "Requesting model");
                    let response = self.request_model(session, &schemas).await?;
                    self.apply(session, response, round, ctx).await
                }
            };
        }
    }

    async fn request_model(
        &self,
        session: &Session,
        schemas: &[ToolDescriptor],
    ) -> Result<LlmResponse, DispatchError> {
        let request = LlmRequest {
            messages: session.messages().to_vec(),
            tools: schemas.to_vec(),
            max_tokens: None,
        };

        match timeout(self.limits.round_timeout, self.llm.complete(&request)).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(
                    timeout_ms = %self.limits.round_timeout.as_millis(),
                    "Model round deadline exceeded"
                );
                Err(DispatchError::TurnTimeout(self.limits.round_timeout))
            }
        }
    }

    /// Fold one backend response into the session and pick the next state
    async fn apply(
        &self,
        session: &mut Session,
        response: LlmResponse,
        round: u32,
        ctx: &ToolContext,
    ) -> LoopState {
        if !response.wants_tools() {
            let mut message = response.message;
            // A plain answer never leaves calls without results
            message.tool_calls.clear();
            let text = message.text().to_string();
            session.push_assistant(message);
            if let Err(e) = session.verify_correlation() {
                tracing::warn!(error = %e, "Transcript tool results do not line up with calls");
            }
            tracing::info!(rounds = round, "Turn complete");
            return LoopState::Done { text };
        }

        let calls = response.message.tool_calls.clone();
        session.push_assistant(response.message);
        for call in &calls {
            let output = self.execute_call(call, ctx).await;
            session.push_tool_result(call, output.to_content());
        }

        LoopState::AwaitingModel { round: round + 1 }
    }

    /// Execute one call. Never fails: problems become an error result the
    /// backend can read.
    async fn execute_call(&self, call: &ToolCall, ctx: &ToolContext) -> ToolOutput {
        tracing::info!(tool = %call.name, tool_call_id = %call.id, "Tool called");

        let tool = match self.tools.resolve(&call.name) {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!(error = %e, "Backend requested an unknown tool");
                return ToolOutput::error(format!("Unknown tool: {}", call.name));
            }
        };

        let input = match ToolInput::parse(&call.name, &call.arguments) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected tool arguments");
                return ToolOutput::error(format!("Invalid arguments for {}: {e}", call.name));
            }
        };

        let output = tool.run(input, ctx.clone()).await;
        if !output.success {
            tracing::warn!(tool = %call.name, result = %output.value, "Tool reported failure");
        }
        output
    }
}
