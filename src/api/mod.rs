pub mod client;
pub mod models;
pub mod slots;

pub use client::{ApiClient, HttpApiClient};
pub use slots::{CallSlots, Orchestrator};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One independent channel per logical operation. Each slot accepts at most
/// one in-flight call; a newer call supersedes the older one and the older
/// response is dropped when it eventually arrives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
  Generate,
  Execute,
  TestConnection,
  Schema,
  Tables,
  Structure,
  Page,
}

/// Failure taxonomy for everything that can go wrong between a user action
/// and a usable payload. `Precondition` never reaches the network; the other
/// three map transport, parse, and server-reported failures onto one shape so
/// callers handle them uniformly.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ApiError {
  #[error("connection error: {0}")]
  Transport(String),

  #[error("invalid response from server: {detail}")]
  Decode { detail: String, raw: String },

  #[error("{message}")]
  Reported { message: String, details: Option<String> },

  #[error("{0}")]
  Precondition(String),
}

impl ApiError {
  pub fn reported(message: impl Into<String>) -> Self {
    ApiError::Reported { message: message.into(), details: None }
  }

  /// Raw diagnostic detail kept for the log, never shown to the user.
  pub fn detail(&self) -> Option<&str> {
    match self {
      ApiError::Decode { raw, .. } => Some(raw.as_str()),
      ApiError::Reported { details, .. } => details.as_deref(),
      _ => None,
    }
  }
}
