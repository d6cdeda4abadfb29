pub mod handlers;
pub mod helpers;
pub mod models;
pub mod rendering;
pub mod state;

// Re-export commonly used types
pub use models::{BrowserSelection, BrowserSubview, Notification, ViewPanel};

use std::time::Instant;

use color_eyre::eyre::Result;
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use super::{Component, ComponentKind, Frame};
use crate::{
    action::Action,
    api::models::{ColumnStructure, GenerationResult, Row, SchemaSnapshot, TableSummary},
    classify::{ExecutionOutcome, QueryType},
    config::Config,
    paging::PageState,
};

/// Page sizes the browser cycles through; mirrors the original selector.
pub const PAGE_SIZES: [u64; 4] = [10, 25, 50, 100];

/// The view state machine. Owns the active panel, the browser selection and
/// page state, and the last received generation/execution/schema payloads.
/// Everything here is mutated only through `update`; the orchestrator,
/// classifier and pagination tracker are invoked as functions returning new
/// values that get applied in one place.
pub struct Workbench {
    pub command_tx: Option<UnboundedSender<Action>>,
    pub config: Config,

    // Focus and foreground panel
    pub focus: ComponentKind,
    pub panel: ViewPanel,

    // Prompt input line
    pub prompt_input: String,

    // Last successful payloads, replaced wholesale on each new success
    pub generation: Option<GenerationResult>,
    pub execution: Option<(ExecutionOutcome, QueryType)>,
    pub schema: Option<SchemaSnapshot>,

    // Table browser
    pub tables: Vec<TableSummary>,
    pub selected_table_index: usize,
    pub selection: Option<BrowserSelection>,
    pub structure: Vec<ColumnStructure>,
    pub page_rows: Vec<Row>,
    pub page: PageState,
    pub browser_notice: Option<String>,

    // Chrome
    pub notification: Option<Notification>,
    pub is_busy: bool,
    pub show_help: bool,
    pub status_message: Option<(String, Instant)>,

    // Scroll positions
    pub result_row_index: usize,
    pub schema_scroll: u16,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbench {
    pub fn new() -> Self {
        Self::new_with_config(None)
    }

    pub fn new_with_config(config: Option<Config>) -> Self {
        let config = config.unwrap_or_default();
        let page = PageState::reset(config.browser.page_size);
        Self {
            command_tx: None,
            config,
            focus: ComponentKind::Prompt,
            panel: ViewPanel::None,
            prompt_input: String::new(),
            generation: None,
            execution: None,
            schema: None,
            tables: vec![],
            selected_table_index: 0,
            selection: None,
            structure: vec![],
            page_rows: vec![],
            page,
            browser_notice: None,
            notification: None,
            is_busy: false,
            show_help: false,
            status_message: None,
            result_row_index: 0,
            schema_scroll: 0,
        }
    }
}

impl Component for Workbench {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.command_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.register_config_handler(config)
    }

    fn init(&mut self, _area: Rect) -> Result<()> {
        Ok(())
    }

    fn handle_events(&mut self, event: Option<crate::tui::Event>) -> Result<Option<Action>> {
        self.handle_events(event)
    }

    fn handle_key_events(&mut self, key: crossterm::event::KeyEvent) -> Result<Option<Action>> {
        self.handle_key_events(key)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        self.update(action)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        self.draw(f, area)
    }
}
