//! Property-based tests for the dispatch loop
//!
//! For any scripted sequence of tool rounds followed by an answer:
//! - The turn terminates with the scripted answer
//! - Every tool call gets exactly one result, in call order, even when
//!   ids restart every round
//! - Only well-formed calls to known tools reach the notifier
//! - The backend is called once per round plus once for the answer

use super::testing::{RecordingNotifier, ScriptedLlm};
use super::{DispatchError, DispatchLimits, Dispatcher};
use crate::llm::{LlmResponse, Role, ToolCall};
use crate::session::{check_correlation, Session};
use crate::tools::ToolRegistry;
use proptest::prelude::*;
use std::sync::Arc;

const TOOL_NAMES: [&str; 5] = [
    "record_user_details",
    "record_unknown_question",
    "record_conversation_log",
    "record_job_interest",
    "mystery_tool",
];

#[derive(Debug, Clone)]
struct PlannedCall {
    name: &'static str,
    well_formed: bool,
}

impl PlannedCall {
    fn arguments(&self) -> String {
        if !self.well_formed {
            return "{}".to_string();
        }
        match self.name {
            "record_user_details" => r#"{"email":"visitor@example.com"}"#,
            "record_unknown_question" => r#"{"question":"Favourite colour?"}"#,
            "record_conversation_log" => r#"{"summary":"Discussed a BI project"}"#,
            "record_job_interest" => r#"{"role_title":"Data Analyst"}"#,
            _ => r#"{"anything":true}"#,
        }
        .to_string()
    }

    /// True when the call should produce a notification
    fn notifies(&self) -> bool {
        self.well_formed && self.name != "mystery_tool"
    }
}

fn arb_call() -> impl Strategy<Value = PlannedCall> {
    (prop::sample::select(TOOL_NAMES.to_vec()), any::<bool>())
        .prop_map(|(name, well_formed)| PlannedCall { name, well_formed })
}

fn arb_rounds() -> impl Strategy<Value = Vec<Vec<PlannedCall>>> {
    prop::collection::vec(prop::collection::vec(arb_call(), 1..4), 0..6)
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(future)
}

/// Queue one tool-call response per round, then an answer. With
/// `restart_ids` every round numbers its calls from zero, so ids repeat
/// across rounds.
fn script(rounds: &[Vec<PlannedCall>], restart_ids: bool) -> (Arc<ScriptedLlm>, Vec<String>) {
    let llm = Arc::new(ScriptedLlm::new());
    let mut ids = Vec::new();
    for (r, round) in rounds.iter().enumerate() {
        let calls = round
            .iter()
            .enumerate()
            .map(|(i, planned)| {
                let id = if restart_ids {
                    format!("call_{i}")
                } else {
                    format!("call_{r}_{i}")
                };
                ids.push(id.clone());
                ToolCall::new(id, planned.name, planned.arguments())
            })
            .collect();
        llm.queue_response(LlmResponse::tool_calls(calls));
    }
    llm.queue_response(LlmResponse::answer("final answer"));
    (llm, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_call_answered_once_in_order(rounds in arb_rounds(), restart_ids in any::<bool>()) {
        let (llm, ids) = script(&rounds, restart_ids);
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = Dispatcher::new(
            llm.clone(),
            Arc::new(ToolRegistry::standard()),
            notifier.clone(),
            DispatchLimits::default(),
        );
        let mut session = Session::start("persona", vec![], "hello");

        let reply = run(dispatcher.run_turn(&mut session));

        prop_assert_eq!(reply.ok(), Some("final answer".to_string()));
        prop_assert_eq!(llm.call_count(), rounds.len() + 1);
        prop_assert_eq!(check_correlation(session.messages()), Ok(()));

        let result_ids: Vec<String> = session
            .messages()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .filter_map(|m| m.tool_call_id.clone())
            .collect();
        prop_assert_eq!(result_ids, ids);

        let expected_notifications = rounds.iter().flatten().filter(|c| c.notifies()).count();
        prop_assert_eq!(notifier.messages().len(), expected_notifications);
    }

    #[test]
    fn prop_round_cap_bounds_backend_calls(max_rounds in 1u32..6, extra in 1usize..4) {
        let planned = PlannedCall { name: "record_conversation_log", well_formed: true };
        let rounds = vec![vec![planned]; max_rounds as usize + extra];
        let (llm, _) = script(&rounds, true);
        let notifier = Arc::new(RecordingNotifier::default());
        let limits = DispatchLimits { max_rounds, ..DispatchLimits::default() };
        let dispatcher = Dispatcher::new(
            llm.clone(),
            Arc::new(ToolRegistry::standard()),
            notifier,
            limits,
        );
        let mut session = Session::start("persona", vec![], "hello");

        let result = run(dispatcher.run_turn(&mut session));

        prop_assert!(
            matches!(result, Err(DispatchError::ToolLoopExceeded { rounds }) if rounds == max_rounds),
            "expected round cap error"
        );
        prop_assert_eq!(llm.call_count(), max_rounds as usize);
        prop_assert_eq!(check_correlation(session.messages()), Ok(()));
    }
}
