use serde::{Deserialize, Serialize};
use strum::Display;

use crate::api::{
  models::{ColumnStructure, ExecuteResponse, GenerationResult, PageResponse, SchemaSnapshot, TableSummary},
  ApiError, Slot,
};

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  Quit,
  Refresh,
  Error(String),
  Help,

  // User intents, bindable from the keybinding config.
  FocusPrompt,
  FocusResults,
  SubmitPrompt,
  ExecuteStatement,
  TestConnection,
  ViewSchema,
  OpenBrowser,
  CloseBrowser,
  RefreshTables,
  SelectTable,
  ShowStructure,
  ShowData,
  NextPage,
  PrevPage,
  CyclePageSize,
  ShowGeneration,
  ShowExecution,
  CopyStatement,
  CopyDeployment,
  ExportCsv,
  TableMoveUp,
  TableMoveDown,
  RowMoveUp,
  RowMoveDown,

  // Network requests, serviced by the orchestrator in the app loop.
  GeneratePlan(String),
  ExecuteSql(String),
  FetchSchema,
  FetchTables,
  FetchStructure { table: String, schema: String },
  FetchPage { table: String, schema: String, limit: u64, offset: u64 },

  // Slot-stamped completions dispatched by orchestrator tasks. A completion
  // whose token is not the slot's latest is discarded before it reaches any
  // component.
  GenerationLoaded { token: u64, result: Result<GenerationResult, ApiError> },
  ExecutionLoaded { token: u64, result: Result<ExecuteResponse, ApiError> },
  ConnectionTested { token: u64, result: Result<String, ApiError> },
  SchemaLoaded { token: u64, result: Result<SchemaSnapshot, ApiError> },
  TablesLoaded { token: u64, result: Result<Vec<TableSummary>, ApiError> },
  StructureLoaded { token: u64, result: Result<Vec<ColumnStructure>, ApiError> },
  PageLoaded { token: u64, result: Result<PageResponse, ApiError> },

  SetBusy(bool),
}

impl Action {
  /// The slot and call token of a completion action, if this is one.
  pub fn completion_slot(&self) -> Option<(Slot, u64)> {
    match self {
      Action::GenerationLoaded { token, .. } => Some((Slot::Generate, *token)),
      Action::ExecutionLoaded { token, .. } => Some((Slot::Execute, *token)),
      Action::ConnectionTested { token, .. } => Some((Slot::TestConnection, *token)),
      Action::SchemaLoaded { token, .. } => Some((Slot::Schema, *token)),
      Action::TablesLoaded { token, .. } => Some((Slot::Tables, *token)),
      Action::StructureLoaded { token, .. } => Some((Slot::Structure, *token)),
      Action::PageLoaded { token, .. } => Some((Slot::Page, *token)),
      _ => None,
    }
  }
}
