use query_pilot::api::models::{
    ExecuteResponse, GenerationResult, PageResponse, Row, TableSummary, ValidationReport,
};
use query_pilot::classify::QueryType;
use serde_json::{json, Value};

pub fn row(pairs: &[(&str, Value)]) -> Row {
    let mut row = Row::new();
    for (key, value) in pairs {
        row.insert((*key).to_string(), value.clone());
    }
    row
}

/// `count` user rows with id/name/email columns, ids starting at `first_id`.
pub fn user_rows(first_id: u64, count: usize) -> Vec<Row> {
    (0..count as u64)
        .map(|i| {
            let id = first_id + i;
            row(&[
                ("id", json!(id)),
                ("name", json!(format!("user_{id}"))),
                ("email", json!(format!("user_{id}@example.com"))),
            ])
        })
        .collect()
}

pub fn table_summary(schema: &str, name: &str, column_count: u64) -> TableSummary {
    TableSummary {
        table_schema: schema.to_string(),
        table_name: name.to_string(),
        column_count,
        table_description: None,
        table_size: None,
    }
}

pub fn generation(sql: &str) -> GenerationResult {
    GenerationResult {
        sql: sql.to_string(),
        intent: json!({ "action": "select", "table": "users" }),
        deployment_script: format!("-- deployment\n{sql}"),
        validation: ValidationReport { valid: true, ..ValidationReport::default() },
    }
}

pub fn execute_response(result: Value, query_type: QueryType) -> ExecuteResponse {
    ExecuteResponse { result, query_type }
}

pub fn page_response(data: Vec<Row>, total_count: u64, limit: u64, offset: u64) -> PageResponse {
    PageResponse { data, total_count, limit, offset }
}
