//! Test doubles for the dispatch loop
//!
//! These run turns end to end without network I/O.

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::notifier::Notifier;
use crate::tools::{Tool, ToolContext, ToolInput, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Scripted model backend
// ============================================================================

/// Model backend that replays queued responses in order
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    /// Returned once the queue is drained; a network error otherwise
    fallback: Option<LlmResponse>,
    delay: Option<Duration>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Backend that answers every call with `response`
    pub fn always(response: LlmResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::new()
        }
    }

    /// Sleep before every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LlmError::network("No scripted response queued")),
        }
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

// ============================================================================
// Recording notifier
// ============================================================================

/// Notifier that keeps every message in memory
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

/// Tool context wired to a fresh [`RecordingNotifier`]
pub fn test_context() -> (ToolContext, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = ToolContext::new("test-turn", notifier.clone());
    (ctx, notifier)
}

// ============================================================================
// Counting tool
// ============================================================================

/// Tool that appends its name to a shared log on every run
pub struct CountingTool {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl CountingTool {
    pub fn new(name: impl Into<String>, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Counts invocations of {}", self.name)
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {}, "additionalProperties": true })
    }

    async fn run(&self, _input: ToolInput, _ctx: ToolContext) -> ToolOutput {
        self.log.lock().unwrap().push(self.name.clone());
        ToolOutput::recorded()
    }
}
