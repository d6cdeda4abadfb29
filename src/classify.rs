use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::models::Row;

/// The renderable shape of an execute payload. The server returns either a
/// human-readable message, a list of rows, or nothing useful; this is the
/// one place that decides which, so nothing downstream sniffs value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
  Scalar(String),
  Rowset(Vec<Row>),
  Empty,
}

impl ExecutionOutcome {
  pub fn rows(&self) -> Option<&[Row]> {
    match self {
      ExecutionOutcome::Rowset(rows) => Some(rows),
      _ => None,
    }
  }
}

/// Tags a raw `result` value. First match wins: text is a scalar message, a
/// sequence is a rowset (or empty), anything else means the statement ran
/// without producing output. Row key sets are not validated against each
/// other; the header is derived downstream from the first row alone.
pub fn classify(result: &Value) -> ExecutionOutcome {
  match result {
    Value::String(text) => ExecutionOutcome::Scalar(text.clone()),
    Value::Array(items) if items.is_empty() => ExecutionOutcome::Empty,
    Value::Array(items) => {
      let rows = items
        .iter()
        .map(|item| match item {
          Value::Object(map) => map.clone(),
          other => {
            let mut row = Row::new();
            row.insert("value".to_string(), other.clone());
            row
          },
        })
        .collect();
      ExecutionOutcome::Rowset(rows)
    },
    _ => ExecutionOutcome::Empty,
  }
}

/// Presentation hint for scalar messages. Layered on top of the classifier:
/// it colors the message, it never changes the tagged variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageSeverity {
  Success,
  Warning,
  Info,
}

pub fn severity_hint(text: &str) -> MessageSeverity {
  if text.contains("already exists") {
    MessageSeverity::Warning
  } else if text.contains("successfully") {
    MessageSeverity::Success
  } else {
    MessageSeverity::Info
  }
}

/// Statement classification reported by the server alongside execute
/// results. Presentation only; no control flow depends on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryType {
  Select,
  Insert,
  Update,
  Delete,
  CreateTable,
  AlterTable,
  Drop,
  #[default]
  #[serde(other)]
  Other,
}

impl QueryType {
  pub fn label(&self) -> &'static str {
    match self {
      QueryType::Select => "SELECT",
      QueryType::Insert => "INSERT",
      QueryType::Update => "UPDATE",
      QueryType::Delete => "DELETE",
      QueryType::CreateTable => "CREATE TABLE",
      QueryType::AlterTable => "ALTER TABLE",
      QueryType::Drop => "DROP",
      QueryType::Other => "OTHER",
    }
  }
}
