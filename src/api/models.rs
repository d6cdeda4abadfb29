use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::QueryType;

/// One result row: column name to value, in server column order. Relies on
/// serde_json's `preserve_order` feature; without it the map would sort keys
/// alphabetically and scramble the header derivation.
pub type Row = serde_json::Map<String, Value>;

/// Everything a successful generate call produces. Replaced wholesale by the
/// next successful call, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
  pub sql: String,
  #[serde(default)]
  pub intent: Value,
  #[serde(default)]
  pub deployment_script: String,
  #[serde(default)]
  pub validation: ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
  #[serde(default)]
  pub valid: bool,
  #[serde(default)]
  pub errors: Vec<String>,
  #[serde(default)]
  pub warnings: Vec<String>,
  #[serde(default)]
  pub suggestions: Vec<String>,
}

impl ValidationReport {
  pub fn is_empty(&self) -> bool {
    self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
  }
}

/// Raw execute payload; the `result` value is classified downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
  #[serde(default)]
  pub result: Value,
  #[serde(default)]
  pub query_type: QueryType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
  #[serde(default)]
  pub tables: Vec<SchemaTable>,
  #[serde(default)]
  pub views: Vec<SchemaView>,
  #[serde(default)]
  pub functions: Vec<SchemaFunction>,
}

impl SchemaSnapshot {
  pub fn is_empty(&self) -> bool {
    self.tables.is_empty() && self.views.is_empty() && self.functions.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaTable {
  #[serde(default)]
  pub schema: String,
  pub name: String,
  #[serde(default)]
  pub columns: Vec<SchemaColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
  pub column_name: String,
  #[serde(default)]
  pub data_type: String,
  #[serde(default)]
  pub is_nullable: String,
  #[serde(default)]
  pub column_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaView {
  #[serde(default)]
  pub view_schema: String,
  pub view_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFunction {
  #[serde(default)]
  pub function_schema: String,
  pub function_name: String,
}

/// One entry of the browser's table list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
  pub table_schema: String,
  pub table_name: String,
  #[serde(default)]
  pub column_count: u64,
  #[serde(default)]
  pub table_description: Option<String>,
  #[serde(default)]
  pub table_size: Option<i64>,
}

/// One column of a table-structure listing. `is_nullable` stays the wire's
/// "YES"/"NO" text; presentation decides how to show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStructure {
  pub column_name: String,
  #[serde(default)]
  pub data_type: String,
  #[serde(default)]
  pub character_maximum_length: Option<i64>,
  #[serde(default)]
  pub numeric_precision: Option<i64>,
  #[serde(default)]
  pub numeric_scale: Option<i64>,
  #[serde(default)]
  pub is_nullable: String,
  #[serde(default)]
  pub column_default: Option<String>,
  #[serde(default)]
  pub is_primary_key: bool,
}

impl ColumnStructure {
  /// Type rendered the way the original browser did: length for character
  /// types, precision/scale for numerics.
  pub fn display_type(&self) -> String {
    if let Some(len) = self.character_maximum_length {
      format!("{}({len})", self.data_type)
    } else if let (Some(p), Some(s)) = (self.numeric_precision, self.numeric_scale) {
      format!("{}({p},{s})", self.data_type)
    } else {
      self.data_type.clone()
    }
  }
}

/// A successful page fetch. `limit` and `offset` echo what the server
/// actually used; the pagination tracker trusts the echo, not the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
  #[serde(default)]
  pub data: Vec<Row>,
  #[serde(default)]
  pub total_count: u64,
  pub limit: u64,
  pub offset: u64,
}
