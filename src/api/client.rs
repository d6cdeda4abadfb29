use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::{
  models::{ColumnStructure, ExecuteResponse, GenerationResult, PageResponse, SchemaSnapshot, TableSummary},
  ApiError,
};

/// The wire contract of the SQL assistant service, one method per action
/// slot. Implementations are held behind `Arc<dyn ApiClient>` by the
/// orchestrator so tests can substitute a scripted double.
#[async_trait]
pub trait ApiClient: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<GenerationResult, ApiError>;
  async fn execute(&self, query: &str) -> Result<ExecuteResponse, ApiError>;
  async fn test_connection(&self) -> Result<String, ApiError>;
  async fn fetch_schema(&self) -> Result<SchemaSnapshot, ApiError>;
  async fn list_tables(&self) -> Result<Vec<TableSummary>, ApiError>;
  async fn table_structure(&self, table: &str, schema: &str) -> Result<Vec<ColumnStructure>, ApiError>;
  async fn table_page(&self, table: &str, schema: &str, limit: u64, offset: u64) -> Result<PageResponse, ApiError>;
}

pub struct HttpApiClient {
  client: reqwest::Client,
  base_url: String,
}

impl HttpApiClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { client: reqwest::Client::new(), base_url }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }

  async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
    debug!("GET {path}");
    let response = self
      .client
      .get(self.url(path))
      .query(query)
      .send()
      .await
      .map_err(|e| ApiError::Transport(e.to_string()))?;
    Self::decode(response).await
  }

  async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
    debug!("POST {path}");
    let response = self
      .client
      .post(self.url(path))
      .json(&body)
      .send()
      .await
      .map_err(|e| ApiError::Transport(e.to_string()))?;
    Self::decode(response).await
  }

  /// Turns an HTTP response into the decoded envelope value, mapping each
  /// failure mode onto the taxonomy: unreachable/unreadable -> Transport,
  /// unparsable body -> Decode, decoded-but-unsuccessful -> Reported.
  async fn decode(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;

    let value: Value = match serde_json::from_str(&text) {
      Ok(value) => value,
      Err(e) if status.is_success() => {
        error!("failed to parse server response: {e}");
        return Err(ApiError::Decode { detail: e.to_string(), raw: text });
      },
      Err(_) => {
        error!("server responded with status {status}");
        return Err(ApiError::Transport(format!("server responded with status {status}")));
      },
    };

    if value.get("success").and_then(Value::as_bool) == Some(true) {
      return Ok(value);
    }

    // Reported failure. Most endpoints put the text in `error`; the
    // connection test uses `message`.
    let message = value
      .get("error")
      .or_else(|| value.get("message"))
      .and_then(Value::as_str)
      .unwrap_or("The server reported a failure without a message.")
      .to_string();
    let details = value.get("error_details").and_then(Value::as_str).map(str::to_string);
    if let Some(details) = &details {
      error!("server reported failure: {message}: {details}");
    }
    Err(ApiError::Reported { message, details })
  }

  fn extract<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| ApiError::Decode { detail: e.to_string(), raw })
  }
}

#[async_trait]
impl ApiClient for HttpApiClient {
  async fn generate(&self, prompt: &str) -> Result<GenerationResult, ApiError> {
    let value = self.post_json("/api/process", json!({ "prompt": prompt })).await?;
    Self::extract(value)
  }

  async fn execute(&self, query: &str) -> Result<ExecuteResponse, ApiError> {
    let value = self.post_json("/api/execute", json!({ "query": query })).await?;
    Self::extract(value)
  }

  async fn test_connection(&self) -> Result<String, ApiError> {
    let value = self.get_json("/api/test-connection", &[]).await?;
    let message = value
      .get("message")
      .and_then(Value::as_str)
      .unwrap_or("Connection successful.")
      .to_string();
    Ok(message)
  }

  async fn fetch_schema(&self) -> Result<SchemaSnapshot, ApiError> {
    let value = self.get_json("/api/schema", &[]).await?;
    match value.get("schema") {
      Some(schema) => Self::extract(schema.clone()),
      None => Ok(SchemaSnapshot::default()),
    }
  }

  async fn list_tables(&self) -> Result<Vec<TableSummary>, ApiError> {
    let value = self.get_json("/api/browser/tables", &[]).await?;
    match value.get("tables") {
      Some(tables) => Self::extract(tables.clone()),
      None => Ok(Vec::new()),
    }
  }

  async fn table_structure(&self, table: &str, schema: &str) -> Result<Vec<ColumnStructure>, ApiError> {
    let query = [("table", table.to_string()), ("schema", schema.to_string())];
    let value = self.get_json("/api/browser/table/structure", &query).await?;
    match value.get("structure") {
      Some(structure) => Self::extract(structure.clone()),
      None => Ok(Vec::new()),
    }
  }

  async fn table_page(&self, table: &str, schema: &str, limit: u64, offset: u64) -> Result<PageResponse, ApiError> {
    let query = [
      ("table", table.to_string()),
      ("schema", schema.to_string()),
      ("limit", limit.to_string()),
      ("offset", offset.to_string()),
    ];
    let value = self.get_json("/api/browser/table/data", &query).await?;
    Self::extract(value)
  }
}
