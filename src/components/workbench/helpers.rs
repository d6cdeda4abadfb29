use std::{fs, time::Instant};

use chrono;
use serde_json::Value;

use super::Workbench;
use crate::{api::models::Row, api::ApiError, export};

impl Workbench {
    pub(super) fn notify(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notification = Some(super::Notification::new(title, message));
    }

    /// Notifies the user with the failure's message and keeps the raw
    /// diagnostic detail in the log only.
    pub(super) fn fail(&mut self, title: &str, err: &ApiError) {
        match err.detail() {
            Some(detail) => log::error!("{title}: {err}: {detail}"),
            None => log::error!("{title}: {err}"),
        }
        self.notify(title, err.to_string());
    }

    pub(super) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub(super) fn copy_to_clipboard(&mut self, text: &str, what: &str) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
            Ok(()) => self.set_status(format!("Copied {what} to clipboard")),
            Err(err) => {
                log::error!("clipboard copy failed: {err}");
                self.notify("Error", "Failed to copy to clipboard.");
            },
        }
    }

    /// Writes the rowset next to the working directory and reports the
    /// filename in the status line.
    pub(super) fn export_rows(&mut self, rows: &[Row]) {
        let csv = export::to_csv(rows);
        if csv.is_empty() {
            self.notify("Error", "No tabular results to export.");
            return;
        }

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("query_results_{timestamp}.csv");
        match fs::write(&filename, csv) {
            Ok(()) => self.set_status(format!("Exported to: {filename}")),
            Err(err) => {
                log::error!("csv export failed: {err}");
                self.notify("Error", "Failed to write the export file.");
            },
        }
    }
}

/// Cell text for table widgets: NULL stays visible, nested values collapse
/// to compact JSON.
pub(super) fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
