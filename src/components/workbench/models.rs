use serde::{Deserialize, Serialize};

/// The foreground panel. Exactly one (or None) is visible at a time;
/// switching panels hides the others without destroying their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewPanel {
    #[default]
    None,
    Generation,
    Execution,
    Schema,
    Browser(BrowserSubview),
}

impl ViewPanel {
    pub fn is_browser(&self) -> bool {
        matches!(self, ViewPanel::Browser(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserSubview {
    List,
    Structure,
    Data,
}

/// The table the browser is focused on. None until the user picks one;
/// structure and data subviews are inaccessible without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSelection {
    pub table: String,
    pub schema: String,
}

impl BrowserSelection {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// A user-facing message shown as a modal popup until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into() }
    }
}
