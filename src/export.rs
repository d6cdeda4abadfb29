use serde_json::Value;

use crate::api::models::Row;

/// Serializes a rowset as delimited text: header from the first row's keys,
/// nulls as empty fields, comma-containing strings wrapped in double quotes.
///
/// Best-effort by design, not RFC 4180: embedded quotes and newlines are not
/// escaped, and non-string values are serialized as JSON unquoted. Matches
/// what the service's own export produced.
pub fn to_csv(rows: &[Row]) -> String {
  let Some(first) = rows.first() else {
    return String::new();
  };

  let headers: Vec<&str> = first.keys().map(String::as_str).collect();
  let mut out = headers.join(",");
  out.push('\n');

  for row in rows {
    let fields: Vec<String> = headers.iter().map(|header| render_field(row.get(*header))).collect();
    out.push_str(&fields.join(","));
    out.push('\n');
  }

  out
}

fn render_field(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(text)) if text.contains(',') => format!("\"{text}\""),
    Some(Value::String(text)) => text.clone(),
    Some(other) => other.to_string(),
  }
}
