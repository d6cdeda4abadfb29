use pretty_assertions::assert_eq;
use query_pilot::action::Action;
use query_pilot::api::ApiError;
use query_pilot::classify::{ExecutionOutcome, QueryType};
use query_pilot::components::workbench::{BrowserSubview, ViewPanel, Workbench};
use query_pilot::components::{Component, ComponentKind};
use serde_json::json;
use tokio::sync::mpsc;

use crate::test_utils::fixtures;

fn create_workbench() -> Workbench {
    let mut workbench = Workbench::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    workbench.register_action_handler(tx).unwrap();
    workbench
}

#[test]
fn test_empty_prompt_is_rejected_before_any_network_call() {
    let mut workbench = create_workbench();
    workbench.prompt_input = "   ".to_string();

    let result = workbench.update(Action::SubmitPrompt).unwrap();

    assert_eq!(result, None);
    assert!(workbench.notification.is_some());
    assert_eq!(workbench.panel, ViewPanel::None);
}

#[test]
fn test_prompt_submission_emits_a_generate_request() {
    let mut workbench = create_workbench();
    workbench.prompt_input = "list all users".to_string();

    let result = workbench.update(Action::SubmitPrompt).unwrap();

    assert_eq!(result, Some(Action::GeneratePlan("list all users".to_string())));
    assert_eq!(workbench.focus, ComponentKind::Results);
}

#[test]
fn test_generation_success_replaces_the_result_and_shows_the_panel() {
    let mut workbench = create_workbench();

    let generation = fixtures::generation("SELECT * FROM users;");
    let result = workbench
        .update(Action::GenerationLoaded { token: 1, result: Ok(generation.clone()) })
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(workbench.panel, ViewPanel::Generation);
    assert_eq!(workbench.generation, Some(generation));
    assert!(workbench.notification.is_none());
}

#[test]
fn test_generation_failure_leaves_the_previous_result_untouched() {
    let mut workbench = create_workbench();
    let previous = fixtures::generation("SELECT * FROM users;");
    workbench
        .update(Action::GenerationLoaded { token: 1, result: Ok(previous.clone()) })
        .unwrap();

    workbench
        .update(Action::GenerationLoaded {
            token: 2,
            result: Err(ApiError::reported("NLP processing error: upstream timeout")),
        })
        .unwrap();

    assert_eq!(workbench.generation, Some(previous));
    assert_eq!(workbench.panel, ViewPanel::Generation);
    let notification = workbench.notification.expect("failure must notify");
    assert!(notification.message.contains("upstream timeout"));
}

#[test]
fn test_execute_without_a_statement_is_a_local_no_op() {
    let mut workbench = create_workbench();

    let result = workbench.update(Action::ExecuteStatement).unwrap();

    assert_eq!(result, None);
    assert!(workbench.notification.is_some());
}

#[test]
fn test_execute_sends_the_generated_statement() {
    let mut workbench = create_workbench();
    workbench
        .update(Action::GenerationLoaded { token: 1, result: Ok(fixtures::generation("SELECT * FROM users;")) })
        .unwrap();

    let result = workbench.update(Action::ExecuteStatement).unwrap();

    assert_eq!(result, Some(Action::ExecuteSql("SELECT * FROM users;".to_string())));
}

#[test]
fn test_empty_result_list_is_rendered_as_empty_not_as_an_error() {
    let mut workbench = create_workbench();

    workbench
        .update(Action::ExecutionLoaded {
            token: 1,
            result: Ok(fixtures::execute_response(json!([]), QueryType::Select)),
        })
        .unwrap();

    assert_eq!(workbench.panel, ViewPanel::Execution);
    assert_eq!(workbench.execution, Some((ExecutionOutcome::Empty, QueryType::Select)));
    assert!(workbench.notification.is_none());
}

#[test]
fn test_rowset_results_are_classified_with_first_row_headers() {
    let mut workbench = create_workbench();

    workbench
        .update(Action::ExecutionLoaded {
            token: 1,
            result: Ok(fixtures::execute_response(
                json!([
                    { "id": 1, "name": "Alice" },
                    { "id": 2, "name": "Bob" },
                ]),
                QueryType::Select,
            )),
        })
        .unwrap();

    let (outcome, query_type) = workbench.execution.clone().expect("outcome stored");
    assert_eq!(query_type, QueryType::Select);
    let rows = outcome.rows().expect("rowset");
    assert_eq!(rows.len(), 2);
    let headers: Vec<&String> = rows[0].keys().collect();
    assert_eq!(headers, ["id", "name"]);
}

#[test]
fn test_reported_execution_failure_keeps_the_previous_outcome() {
    let mut workbench = create_workbench();
    workbench
        .update(Action::ExecutionLoaded {
            token: 1,
            result: Ok(fixtures::execute_response(json!("Table created successfully."), QueryType::CreateTable)),
        })
        .unwrap();
    let before = workbench.execution.clone();

    workbench
        .update(Action::ExecutionLoaded {
            token: 2,
            result: Err(ApiError::Reported {
                message: "syntax error at or near \"FORM\"".to_string(),
                details: Some("traceback".to_string()),
            }),
        })
        .unwrap();

    assert_eq!(workbench.execution, before);
    let notification = workbench.notification.expect("failure must notify");
    assert!(notification.message.contains("syntax error"));
    // Raw details stay out of the user-facing message.
    assert!(!notification.message.contains("traceback"));
}

#[test]
fn test_connection_test_outcome_is_a_notification_either_way() {
    let mut workbench = create_workbench();

    workbench
        .update(Action::ConnectionTested { token: 1, result: Ok("Connected to postgres 15.2".to_string()) })
        .unwrap();
    let ok = workbench.notification.clone().expect("success notifies");
    assert_eq!(ok.title, "Connection Test");

    workbench.notification = None;
    workbench
        .update(Action::ConnectionTested { token: 2, result: Err(ApiError::Transport("refused".to_string())) })
        .unwrap();
    let failed = workbench.notification.expect("failure notifies");
    assert_eq!(failed.title, "Connection Test Failed");
}

#[test]
fn test_schema_overlay_does_not_destroy_results_panels_data() {
    let mut workbench = create_workbench();
    workbench
        .update(Action::GenerationLoaded { token: 1, result: Ok(fixtures::generation("SELECT 1;")) })
        .unwrap();
    workbench
        .update(Action::ExecutionLoaded {
            token: 1,
            result: Ok(fixtures::execute_response(json!([{ "one": 1 }]), QueryType::Select)),
        })
        .unwrap();

    let request = workbench.update(Action::ViewSchema).unwrap();
    assert_eq!(request, Some(Action::FetchSchema));

    workbench
        .update(Action::SchemaLoaded { token: 1, result: Ok(Default::default()) })
        .unwrap();

    assert_eq!(workbench.panel, ViewPanel::Schema);
    assert!(workbench.generation.is_some());
    assert!(workbench.execution.is_some());
}

#[test]
fn test_open_browser_clears_state_and_requests_the_table_list() {
    let mut workbench = create_workbench();

    let request = workbench.update(Action::OpenBrowser).unwrap();

    assert_eq!(request, Some(Action::FetchTables));
    assert_eq!(workbench.panel, ViewPanel::Browser(BrowserSubview::List));
    assert!(workbench.selection.is_none());
    assert!(workbench.tables.is_empty());
    assert_eq!(workbench.page.offset, 0);
}

#[test]
fn test_tables_are_sorted_by_schema_then_name() {
    let mut workbench = create_workbench();
    workbench.update(Action::OpenBrowser).unwrap();

    workbench
        .update(Action::TablesLoaded {
            token: 1,
            result: Ok(vec![
                fixtures::table_summary("public", "users", 3),
                fixtures::table_summary("audit", "events", 5),
                fixtures::table_summary("public", "orders", 7),
            ]),
        })
        .unwrap();

    let names: Vec<String> =
        workbench.tables.iter().map(|t| format!("{}.{}", t.table_schema, t.table_name)).collect();
    assert_eq!(names, ["audit.events", "public.orders", "public.users"]);
}

#[test]
fn test_select_table_requires_the_browser_and_defaults_to_structure() {
    let mut workbench = create_workbench();

    // Browser closed: selecting is inert.
    assert_eq!(workbench.update(Action::SelectTable).unwrap(), None);
    assert!(workbench.selection.is_none());

    workbench.update(Action::OpenBrowser).unwrap();
    workbench
        .update(Action::TablesLoaded { token: 1, result: Ok(vec![fixtures::table_summary("public", "users", 3)]) })
        .unwrap();

    let request = workbench.update(Action::SelectTable).unwrap();

    assert_eq!(
        request,
        Some(Action::FetchStructure { table: "users".to_string(), schema: "public".to_string() })
    );
    assert_eq!(workbench.panel, ViewPanel::Browser(BrowserSubview::Structure));
    assert_eq!(workbench.selection.as_ref().map(|s| s.qualified_name()), Some("public.users".to_string()));
}

#[test]
fn test_structure_and_data_require_a_selection() {
    let mut workbench = create_workbench();
    workbench.update(Action::OpenBrowser).unwrap();

    assert_eq!(workbench.update(Action::ShowStructure).unwrap(), None);
    assert_eq!(workbench.update(Action::ShowData).unwrap(), None);
    assert_eq!(workbench.panel, ViewPanel::Browser(BrowserSubview::List));
}

#[test]
fn test_structure_failure_clears_the_container_and_shows_a_placeholder() {
    let mut workbench = create_workbench();
    workbench.update(Action::OpenBrowser).unwrap();
    workbench
        .update(Action::TablesLoaded { token: 1, result: Ok(vec![fixtures::table_summary("public", "users", 3)]) })
        .unwrap();
    workbench.update(Action::SelectTable).unwrap();

    workbench
        .update(Action::StructureLoaded { token: 1, result: Err(ApiError::reported("relation does not exist")) })
        .unwrap();

    assert!(workbench.structure.is_empty());
    assert_eq!(workbench.browser_notice.as_deref(), Some("Failed to load table structure"));
    assert!(workbench.notification.is_some());
}

fn browse_users_table(workbench: &mut Workbench) {
    workbench.update(Action::OpenBrowser).unwrap();
    workbench
        .update(Action::TablesLoaded { token: 1, result: Ok(vec![fixtures::table_summary("public", "users", 3)]) })
        .unwrap();
    workbench.update(Action::SelectTable).unwrap();
}

#[test]
fn test_paging_walks_forward_and_rejects_the_step_past_the_total() {
    let mut workbench = create_workbench();
    browse_users_table(&mut workbench);

    let request = workbench.update(Action::ShowData).unwrap();
    assert_eq!(
        request,
        Some(Action::FetchPage { table: "users".to_string(), schema: "public".to_string(), limit: 50, offset: 0 })
    );

    workbench
        .update(Action::PageLoaded { token: 1, result: Ok(fixtures::page_response(fixtures::user_rows(1, 50), 120, 50, 0)) })
        .unwrap();
    assert_eq!(workbench.page.summary(), "Showing 1 to 50 of 120 rows");

    let second = workbench.update(Action::NextPage).unwrap();
    assert_eq!(
        second,
        Some(Action::FetchPage { table: "users".to_string(), schema: "public".to_string(), limit: 50, offset: 50 })
    );
    workbench
        .update(Action::PageLoaded { token: 2, result: Ok(fixtures::page_response(fixtures::user_rows(51, 50), 120, 50, 50)) })
        .unwrap();

    let third = workbench.update(Action::NextPage).unwrap();
    assert_eq!(
        third,
        Some(Action::FetchPage { table: "users".to_string(), schema: "public".to_string(), limit: 50, offset: 100 })
    );
    workbench
        .update(Action::PageLoaded {
            token: 3,
            result: Ok(fixtures::page_response(fixtures::user_rows(101, 20), 120, 50, 100)),
        })
        .unwrap();
    assert_eq!(workbench.page.summary(), "Showing 101 to 120 of 120 rows");

    // 100 + 20 shown rows reach the total: rejected locally, no request.
    assert_eq!(workbench.update(Action::NextPage).unwrap(), None);
}

#[test]
fn test_previous_page_is_a_no_op_on_the_first_page() {
    let mut workbench = create_workbench();
    browse_users_table(&mut workbench);
    workbench.update(Action::ShowData).unwrap();
    workbench
        .update(Action::PageLoaded { token: 1, result: Ok(fixtures::page_response(fixtures::user_rows(1, 50), 120, 50, 0)) })
        .unwrap();

    assert_eq!(workbench.update(Action::PrevPage).unwrap(), None);
}

#[test]
fn test_changing_the_page_size_refetches_from_offset_zero() {
    let mut workbench = create_workbench();
    browse_users_table(&mut workbench);
    workbench.update(Action::ShowData).unwrap();
    workbench
        .update(Action::PageLoaded { token: 1, result: Ok(fixtures::page_response(fixtures::user_rows(1, 50), 120, 50, 0)) })
        .unwrap();
    workbench.update(Action::NextPage).unwrap();
    workbench
        .update(Action::PageLoaded { token: 2, result: Ok(fixtures::page_response(fixtures::user_rows(51, 50), 120, 50, 50)) })
        .unwrap();

    let request = workbench.update(Action::CyclePageSize).unwrap();

    assert_eq!(
        request,
        Some(Action::FetchPage { table: "users".to_string(), schema: "public".to_string(), limit: 100, offset: 0 })
    );
    assert_eq!(workbench.page.offset, 0);
    assert_eq!(workbench.page.limit, 100);
}

#[test]
fn test_page_fetch_failure_shows_a_placeholder_instead_of_stale_rows() {
    let mut workbench = create_workbench();
    browse_users_table(&mut workbench);
    workbench.update(Action::ShowData).unwrap();

    workbench
        .update(Action::PageLoaded { token: 1, result: Err(ApiError::Transport("connection reset".to_string())) })
        .unwrap();

    assert!(workbench.page_rows.is_empty());
    assert_eq!(workbench.browser_notice.as_deref(), Some("Failed to load table data"));
    assert!(workbench.notification.is_some());
}

#[test]
fn test_closing_the_browser_resets_selection_and_page_state() {
    let mut workbench = create_workbench();
    workbench
        .update(Action::ExecutionLoaded {
            token: 1,
            result: Ok(fixtures::execute_response(json!([{ "one": 1 }]), QueryType::Select)),
        })
        .unwrap();
    browse_users_table(&mut workbench);
    workbench.update(Action::ShowData).unwrap();
    workbench
        .update(Action::PageLoaded { token: 1, result: Ok(fixtures::page_response(fixtures::user_rows(1, 50), 120, 50, 0)) })
        .unwrap();
    workbench.update(Action::NextPage).unwrap();

    workbench.update(Action::CloseBrowser).unwrap();

    assert!(workbench.selection.is_none());
    assert!(workbench.tables.is_empty());
    assert!(workbench.page_rows.is_empty());
    assert_eq!(workbench.page.offset, 0);
    // The browser hands the foreground back to the last results panel.
    assert_eq!(workbench.panel, ViewPanel::Execution);
}

#[test]
fn test_busy_flag_follows_the_indicator_action() {
    let mut workbench = create_workbench();
    workbench.update(Action::SetBusy(true)).unwrap();
    assert!(workbench.is_busy);
    workbench.update(Action::SetBusy(false)).unwrap();
    assert!(!workbench.is_busy);
}
