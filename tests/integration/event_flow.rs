use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use query_pilot::action::Action;
use query_pilot::api::models::{
    ColumnStructure, ExecuteResponse, GenerationResult, PageResponse, SchemaSnapshot, TableSummary,
};
use query_pilot::api::{ApiClient, ApiError, Orchestrator};
use query_pilot::components::workbench::Workbench;
use query_pilot::components::Component;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::test_utils::fixtures;

/// Scripted service double: every `list_tables` call returns a list naming
/// the call's ordinal, so tests can tell which request produced a payload.
#[derive(Default)]
struct ScriptedClient {
    table_calls: AtomicUsize,
}

#[async_trait]
impl ApiClient for ScriptedClient {
    async fn generate(&self, _prompt: &str) -> Result<GenerationResult, ApiError> {
        Ok(fixtures::generation("SELECT * FROM users;"))
    }

    async fn execute(&self, _query: &str) -> Result<ExecuteResponse, ApiError> {
        Err(ApiError::reported("not scripted"))
    }

    async fn test_connection(&self) -> Result<String, ApiError> {
        Ok("Connection successful.".to_string())
    }

    async fn fetch_schema(&self) -> Result<SchemaSnapshot, ApiError> {
        Ok(SchemaSnapshot::default())
    }

    async fn list_tables(&self) -> Result<Vec<TableSummary>, ApiError> {
        let call = self.table_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![fixtures::table_summary("public", &format!("tables_from_call_{call}"), 1)])
    }

    async fn table_structure(&self, _table: &str, _schema: &str) -> Result<Vec<ColumnStructure>, ApiError> {
        Ok(vec![])
    }

    async fn table_page(&self, _t: &str, _s: &str, limit: u64, offset: u64) -> Result<PageResponse, ApiError> {
        Ok(fixtures::page_response(vec![], 0, limit, offset))
    }
}

async fn recv_completions(rx: &mut UnboundedReceiver<Action>, want: usize) -> Vec<Action> {
    let mut completions = Vec::new();
    while completions.len() < want {
        let action = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("completion within timeout")
            .expect("channel open");
        if action.completion_slot().is_some() {
            completions.push(action);
        }
    }
    completions
}

#[tokio::test]
async fn superseded_list_tables_response_is_discarded() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(Arc::new(ScriptedClient::default()));

    // Two requests in quick succession on the same slot.
    orchestrator.list_tables(&tx);
    orchestrator.list_tables(&tx);

    let completions = recv_completions(&mut rx, 2).await;

    // Whatever order the responses arrived in, only the token of the second
    // request may be accepted.
    let mut workbench = Workbench::new();
    workbench.update(Action::OpenBrowser).unwrap();
    let mut accepted = 0;
    for action in completions {
        let (slot, token) = action.completion_slot().unwrap();
        if orchestrator.accept(slot, token) {
            accepted += 1;
            assert_eq!(token, 2);
            workbench.update(action).unwrap();
        }
    }

    assert_eq!(accepted, 1);
    assert!(orchestrator.idle());
    // The rendered list reflects the latest request's payload.
    assert_eq!(workbench.tables.len(), 1);
    assert_eq!(workbench.tables[0].table_name, "tables_from_call_1");
}

#[tokio::test]
async fn busy_indicator_turns_on_with_the_first_call_and_off_with_the_last() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(Arc::new(ScriptedClient::default()));

    orchestrator.list_tables(&tx);
    orchestrator.fetch_schema(&tx);

    // Exactly one busy-on signal for two overlapping calls.
    let first = rx.recv().await.expect("busy signal");
    assert_eq!(first, Action::SetBusy(true));

    let completions = recv_completions(&mut rx, 2).await;
    assert!(!orchestrator.idle());
    for action in &completions {
        let (slot, token) = action.completion_slot().unwrap();
        assert!(orchestrator.accept(slot, token));
    }
    // Hidden exactly when the outstanding count returns to zero.
    assert!(orchestrator.idle());
}

#[tokio::test]
async fn independent_slots_both_apply() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(Arc::new(ScriptedClient::default()));

    orchestrator.list_tables(&tx);
    orchestrator.test_connection(&tx);

    let completions = recv_completions(&mut rx, 2).await;
    let mut accepted = 0;
    for action in completions {
        let (slot, token) = action.completion_slot().unwrap();
        if orchestrator.accept(slot, token) {
            accepted += 1;
        }
    }

    // No cross-slot ordering requirement: both responses land.
    assert_eq!(accepted, 2);
}

#[tokio::test]
async fn generation_flows_end_to_end_into_the_state_machine() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(Arc::new(ScriptedClient::default()));
    let mut workbench = Workbench::new();

    workbench.prompt_input = "list all users".to_string();
    let request = workbench.update(Action::SubmitPrompt).unwrap().expect("generate request");
    match request {
        Action::GeneratePlan(prompt) => orchestrator.generate(prompt, &tx),
        other => panic!("unexpected request: {other:?}"),
    }

    let completion = recv_completions(&mut rx, 1).await.remove(0);
    let (slot, token) = completion.completion_slot().unwrap();
    assert!(orchestrator.accept(slot, token));
    workbench.update(completion).unwrap();

    assert_eq!(
        workbench.generation.as_ref().map(|g| g.sql.as_str()),
        Some("SELECT * FROM users;")
    );
}
