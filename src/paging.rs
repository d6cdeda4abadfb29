use serde::{Deserialize, Serialize};

/// Pure pagination state for the table browser. Offset and limit describe
/// the page currently on screen (or requested), `total_count` and
/// `page_len` come from the most recent successful fetch and are stale
/// until `apply_page` runs after a table or limit change.
///
/// Boundary rule: "next" is allowed iff `offset + page_len < total_count`,
/// using the row count the server actually returned rather than the
/// requested limit, so a short final page closes the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
  pub offset: u64,
  pub limit: u64,
  pub total_count: u64,
  pub page_len: u64,
}

impl Default for PageState {
  fn default() -> Self {
    Self::reset(50)
  }
}

impl PageState {
  pub fn reset(limit: u64) -> Self {
    Self { offset: 0, limit: limit.max(1), total_count: 0, page_len: 0 }
  }

  /// New state for a changed page size: offset returns to 0, counts are
  /// stale until the next fetch.
  pub fn with_limit(&self, limit: u64) -> Self {
    Self { offset: 0, limit: limit.max(1), total_count: self.total_count, page_len: 0 }
  }

  pub fn can_retreat(&self) -> bool {
    self.offset > 0
  }

  pub fn can_advance(&self) -> bool {
    self.offset + self.page_len < self.total_count
  }

  /// The state to request the next page with, or None when the shown page
  /// already reaches `total_count`.
  pub fn advance(&self) -> Option<Self> {
    if !self.can_advance() {
      return None;
    }
    Some(Self { offset: self.offset + self.limit, ..*self })
  }

  /// The state to request the previous page with, or None at offset 0.
  pub fn retreat(&self) -> Option<Self> {
    if !self.can_retreat() {
      return None;
    }
    Some(Self { offset: self.offset.saturating_sub(self.limit), ..*self })
  }

  /// Authoritative update from a successful fetch. The server's echoed
  /// limit and offset win over whatever was requested.
  pub fn apply_page(&self, page_len: usize, total_count: u64, limit: u64, offset: u64) -> Self {
    Self { offset, limit: limit.max(1), total_count, page_len: page_len as u64 }
  }

  /// "Showing X to Y of Z rows", the 1-based range of the page on screen.
  pub fn summary(&self) -> String {
    if self.page_len == 0 {
      return "No data".to_string();
    }
    let start = self.offset + 1;
    let end = (self.offset + self.page_len).min(self.total_count);
    format!("Showing {start} to {end} of {} rows", self.total_count)
  }
}
