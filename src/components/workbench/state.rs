use std::time::Duration;

use color_eyre::eyre::Result;

use super::{BrowserSelection, BrowserSubview, Workbench, ViewPanel, PAGE_SIZES};
use crate::{
    action::Action,
    classify,
    components::ComponentKind,
    config::Config,
    paging::PageState,
};

const STATUS_LINGER: Duration = Duration::from_secs(5);

impl Workbench {
    pub(super) fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.page = PageState::reset(config.browser.page_size);
        self.config = config;
        Ok(())
    }

    pub(super) fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if let Some((_, since)) = &self.status_message {
                    if since.elapsed() > STATUS_LINGER {
                        self.status_message = None;
                    }
                }
            },
            Action::Help => {
                self.show_help = !self.show_help;
            },
            Action::Error(message) => {
                self.notify("Error", message);
            },
            Action::SetBusy(busy) => {
                self.is_busy = busy;
            },
            Action::FocusPrompt => {
                self.focus = ComponentKind::Prompt;
            },
            Action::FocusResults => {
                self.focus = ComponentKind::Results;
            },

            // Prompt -> generation
            Action::SubmitPrompt => {
                let prompt = self.prompt_input.trim().to_string();
                if prompt.is_empty() {
                    // Local precondition, never reaches the network.
                    self.notify("Error", "Please enter a prompt.");
                    return Ok(None);
                }
                self.focus = ComponentKind::Results;
                return Ok(Some(Action::GeneratePlan(prompt)));
            },
            Action::GenerationLoaded { result, .. } => match result {
                Ok(generation) => {
                    self.generation = Some(generation);
                    self.panel = ViewPanel::Generation;
                },
                Err(err) => {
                    // Previous generation stays on screen untouched.
                    self.fail("Error", &err);
                },
            },

            // Generation -> execution
            Action::ExecuteStatement => {
                let statement = self.generation.as_ref().map(|g| g.sql.trim().to_string()).unwrap_or_default();
                if statement.is_empty() {
                    self.notify("Error", "No SQL query to execute.");
                    return Ok(None);
                }
                return Ok(Some(Action::ExecuteSql(statement)));
            },
            Action::ExecutionLoaded { result, .. } => match result {
                Ok(response) => {
                    let outcome = classify::classify(&response.result);
                    self.execution = Some((outcome, response.query_type));
                    self.result_row_index = 0;
                    self.panel = ViewPanel::Execution;
                },
                Err(err) => {
                    // Previous execution outcome stays untouched.
                    self.fail("Error", &err);
                },
            },

            Action::ConnectionTested { result, .. } => match result {
                Ok(message) => self.notify("Connection Test", message),
                Err(err) => self.fail("Connection Test Failed", &err),
            },

            // Schema overlay
            Action::ViewSchema => {
                return Ok(Some(Action::FetchSchema));
            },
            Action::SchemaLoaded { result, .. } => match result {
                Ok(schema) => {
                    self.schema = Some(schema);
                    self.schema_scroll = 0;
                    self.panel = ViewPanel::Schema;
                },
                Err(err) => {
                    self.fail("Error", &err);
                },
            },

            // Table browser
            Action::OpenBrowser => {
                self.focus = ComponentKind::Browser;
                self.panel = ViewPanel::Browser(BrowserSubview::List);
                self.selection = None;
                self.tables.clear();
                self.structure.clear();
                self.page_rows.clear();
                self.selected_table_index = 0;
                self.page = PageState::reset(self.config.browser.page_size);
                self.browser_notice = None;
                return Ok(Some(Action::FetchTables));
            },
            Action::CloseBrowser => {
                if !self.panel.is_browser() {
                    return Ok(None);
                }
                self.selection = None;
                self.tables.clear();
                self.structure.clear();
                self.page_rows.clear();
                self.selected_table_index = 0;
                self.page = PageState::reset(self.config.browser.page_size);
                self.browser_notice = None;
                self.focus = ComponentKind::Results;
                self.panel = if self.execution.is_some() {
                    ViewPanel::Execution
                } else if self.generation.is_some() {
                    ViewPanel::Generation
                } else {
                    ViewPanel::None
                };
            },
            Action::RefreshTables => {
                if !self.panel.is_browser() {
                    return Ok(None);
                }
                self.tables.clear();
                self.browser_notice = None;
                return Ok(Some(Action::FetchTables));
            },
            Action::TablesLoaded { result, .. } => match result {
                Ok(mut tables) => {
                    tables.sort_by(|a, b| {
                        a.table_schema.cmp(&b.table_schema).then_with(|| a.table_name.cmp(&b.table_name))
                    });
                    self.tables = tables;
                    if self.tables.is_empty() {
                        self.selected_table_index = 0;
                        self.browser_notice = Some("No tables found".to_string());
                    } else {
                        self.selected_table_index = self.selected_table_index.min(self.tables.len() - 1);
                        self.browser_notice = None;
                    }
                },
                Err(err) => {
                    self.browser_notice = Some("Failed to load tables".to_string());
                    self.fail("Error", &err);
                },
            },
            Action::TableMoveDown => {
                if self.panel.is_browser() && !self.tables.is_empty() {
                    if self.selected_table_index < self.tables.len() - 1 {
                        self.selected_table_index += 1;
                    } else {
                        self.selected_table_index = 0; // Wrap to top
                    }
                }
            },
            Action::TableMoveUp => {
                if self.panel.is_browser() && !self.tables.is_empty() {
                    if self.selected_table_index > 0 {
                        self.selected_table_index -= 1;
                    } else {
                        self.selected_table_index = self.tables.len() - 1; // Wrap to bottom
                    }
                }
            },
            Action::SelectTable => {
                if !self.panel.is_browser() {
                    return Ok(None);
                }
                let Some(entry) = self.tables.get(self.selected_table_index) else {
                    return Ok(None);
                };
                let selection =
                    BrowserSelection { table: entry.table_name.clone(), schema: entry.table_schema.clone() };
                self.page = PageState::reset(self.page.limit);
                self.selection = Some(selection.clone());
                // Structure is the default subview for a fresh selection.
                self.panel = ViewPanel::Browser(BrowserSubview::Structure);
                self.structure.clear();
                self.browser_notice = None;
                return Ok(Some(Action::FetchStructure { table: selection.table, schema: selection.schema }));
            },
            Action::ShowStructure => {
                let Some(selection) = self.selection.clone() else {
                    return Ok(None);
                };
                if !self.panel.is_browser() {
                    return Ok(None);
                }
                self.panel = ViewPanel::Browser(BrowserSubview::Structure);
                self.structure.clear();
                self.browser_notice = None;
                return Ok(Some(Action::FetchStructure { table: selection.table, schema: selection.schema }));
            },
            Action::StructureLoaded { result, .. } => match result {
                Ok(columns) => {
                    self.browser_notice = if columns.is_empty() { Some("No columns found".to_string()) } else { None };
                    self.structure = columns;
                },
                Err(err) => {
                    // Container was cleared when the fetch was issued; leave
                    // the placeholder rather than stale columns.
                    self.browser_notice = Some("Failed to load table structure".to_string());
                    self.fail("Error", &err);
                },
            },
            Action::ShowData => {
                let Some(selection) = self.selection.clone() else {
                    return Ok(None);
                };
                if !self.panel.is_browser() {
                    return Ok(None);
                }
                self.panel = ViewPanel::Browser(BrowserSubview::Data);
                self.page_rows.clear();
                self.result_row_index = 0;
                self.browser_notice = None;
                return Ok(Some(Action::FetchPage {
                    table: selection.table,
                    schema: selection.schema,
                    limit: self.page.limit,
                    offset: self.page.offset,
                }));
            },
            Action::NextPage => {
                if self.panel != ViewPanel::Browser(BrowserSubview::Data) {
                    return Ok(None);
                }
                let Some(selection) = self.selection.clone() else {
                    return Ok(None);
                };
                // Rejected locally when the shown page reaches the total.
                let Some(next) = self.page.advance() else {
                    return Ok(None);
                };
                self.page = next;
                self.page_rows.clear();
                self.result_row_index = 0;
                self.browser_notice = None;
                return Ok(Some(Action::FetchPage {
                    table: selection.table,
                    schema: selection.schema,
                    limit: next.limit,
                    offset: next.offset,
                }));
            },
            Action::PrevPage => {
                if self.panel != ViewPanel::Browser(BrowserSubview::Data) {
                    return Ok(None);
                }
                let Some(selection) = self.selection.clone() else {
                    return Ok(None);
                };
                let Some(prev) = self.page.retreat() else {
                    return Ok(None);
                };
                self.page = prev;
                self.page_rows.clear();
                self.result_row_index = 0;
                self.browser_notice = None;
                return Ok(Some(Action::FetchPage {
                    table: selection.table,
                    schema: selection.schema,
                    limit: prev.limit,
                    offset: prev.offset,
                }));
            },
            Action::CyclePageSize => {
                if self.panel != ViewPanel::Browser(BrowserSubview::Data) {
                    return Ok(None);
                }
                let Some(selection) = self.selection.clone() else {
                    return Ok(None);
                };
                let next_limit = next_page_size(self.page.limit);
                self.page = self.page.with_limit(next_limit);
                self.page_rows.clear();
                self.result_row_index = 0;
                self.browser_notice = None;
                return Ok(Some(Action::FetchPage {
                    table: selection.table,
                    schema: selection.schema,
                    limit: next_limit,
                    offset: 0,
                }));
            },
            Action::PageLoaded { result, .. } => match result {
                Ok(response) => {
                    self.page =
                        self.page.apply_page(response.data.len(), response.total_count, response.limit, response.offset);
                    self.browser_notice =
                        if response.data.is_empty() { Some("No data found".to_string()) } else { None };
                    self.page_rows = response.data;
                    self.result_row_index = 0;
                },
                Err(err) => {
                    self.browser_notice = Some("Failed to load table data".to_string());
                    self.fail("Error", &err);
                },
            },

            // Panel recall and scrolling
            Action::ShowGeneration => {
                if self.generation.is_some() {
                    self.panel = ViewPanel::Generation;
                } else {
                    self.notify("Error", "No generated SQL yet.");
                }
            },
            Action::ShowExecution => {
                if self.execution.is_some() {
                    self.panel = ViewPanel::Execution;
                    self.result_row_index = 0;
                } else {
                    self.notify("Error", "No execution results yet.");
                }
            },
            Action::RowMoveDown => {
                let len = self.visible_row_count();
                if len > 0 && self.result_row_index < len - 1 {
                    self.result_row_index += 1;
                }
            },
            Action::RowMoveUp => {
                if self.result_row_index > 0 {
                    self.result_row_index -= 1;
                }
            },

            // Clipboard and export
            Action::CopyStatement => {
                let Some(sql) = self.generation.as_ref().map(|g| g.sql.clone()) else {
                    self.notify("Error", "No generated SQL to copy.");
                    return Ok(None);
                };
                self.copy_to_clipboard(&sql, "SQL");
            },
            Action::CopyDeployment => {
                let Some(script) = self.generation.as_ref().map(|g| g.deployment_script.clone()) else {
                    self.notify("Error", "No deployment script to copy.");
                    return Ok(None);
                };
                self.copy_to_clipboard(&script, "deployment script");
            },
            Action::ExportCsv => {
                let rows = match self.panel {
                    ViewPanel::Execution => {
                        self.execution.as_ref().and_then(|(outcome, _)| outcome.rows()).map(|r| r.to_vec())
                    },
                    ViewPanel::Browser(BrowserSubview::Data) if !self.page_rows.is_empty() => {
                        Some(self.page_rows.clone())
                    },
                    _ => None,
                };
                match rows {
                    Some(rows) if !rows.is_empty() => self.export_rows(&rows),
                    _ => self.notify("Error", "No tabular results to export."),
                }
            },

            _ => {},
        }
        Ok(None)
    }

    fn visible_row_count(&self) -> usize {
        match self.panel {
            ViewPanel::Execution => {
                self.execution.as_ref().and_then(|(outcome, _)| outcome.rows()).map_or(0, |rows| rows.len())
            },
            ViewPanel::Browser(BrowserSubview::Data) => self.page_rows.len(),
            _ => 0,
        }
    }
}

fn next_page_size(current: u64) -> u64 {
    let position = PAGE_SIZES.iter().position(|size| *size == current);
    match position {
        Some(index) => PAGE_SIZES[(index + 1) % PAGE_SIZES.len()],
        None => PAGE_SIZES[0],
    }
}
