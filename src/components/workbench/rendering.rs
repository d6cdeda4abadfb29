use color_eyre::eyre::Result;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::*,
};

use super::{helpers::format_cell, BrowserSubview, Workbench, ViewPanel};
use crate::{
    classify::{severity_hint, ExecutionOutcome, MessageSeverity},
    components::{ComponentKind, Frame},
};
use query_pilot_theme as theme;

const MAX_HEADER_WIDTH: usize = 24;

impl Workbench {
    pub(super) fn draw(&mut self, f: &mut Frame<'_>, _area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_title(f, chunks[0]);
        self.render_prompt(f, chunks[1]);

        match self.panel {
            ViewPanel::None => self.render_welcome(f, chunks[2]),
            ViewPanel::Generation => self.render_generation(f, chunks[2]),
            ViewPanel::Execution => self.render_execution(f, chunks[2]),
            ViewPanel::Schema => self.render_schema(f, chunks[2]),
            ViewPanel::Browser(subview) => self.render_browser(f, chunks[2], subview),
        }

        self.render_status_line(f, chunks[3]);
        self.render_notification(f);
        self.render_help(f);

        Ok(())
    }

    fn render_title(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans = vec![Span::styled(
            "Query Pilot - [Enter] Generate  [e] Execute  [s] Schema  [b] Browser  [t] Test  [?] Help",
            theme::title(),
        )];
        if self.is_busy {
            spans.push(Span::raw("  "));
            spans.push(Span::styled("Working...", theme::busy()));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded)
            .style(theme::bg_primary());
        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_prompt(&self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == ComponentKind::Prompt;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused { theme::border_focused() } else { theme::border_normal() })
            .border_type(BorderType::Rounded)
            .title("Prompt")
            .title_style(theme::title());

        let mut text = self.prompt_input.clone();
        if focused {
            text.push('_');
        }
        f.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_welcome(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::raw(""),
            Line::styled("Describe what you want in plain language and press Enter.", theme::info()),
            Line::raw(""),
            Line::styled("The generated SQL, its intent and a deployment script will show here.", theme::muted()),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded);
        f.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Center), area);
    }

    fn render_generation(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(generation) = &self.generation else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(35), Constraint::Percentage(25)])
            .split(area);

        let sql_block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .border_type(BorderType::Rounded)
            .title("Generated SQL")
            .title_style(theme::title());
        f.render_widget(Paragraph::new(generation.sql.as_str()).block(sql_block).wrap(Wrap { trim: false }), chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let intent = serde_json::to_string_pretty(&generation.intent).unwrap_or_else(|_| "{}".to_string());
        let intent_block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded)
            .title("Intent")
            .title_style(theme::title());
        f.render_widget(Paragraph::new(intent).block(intent_block).wrap(Wrap { trim: false }), middle[0]);

        let deployment_block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded)
            .title("Deployment Script")
            .title_style(theme::title());
        f.render_widget(
            Paragraph::new(generation.deployment_script.as_str()).block(deployment_block).wrap(Wrap { trim: false }),
            middle[1],
        );

        let validation = &generation.validation;
        let mut lines = vec![if validation.valid {
            Line::styled("SQL is valid.", theme::success())
        } else {
            Line::styled("SQL is not valid.", theme::error())
        }];
        for error in &validation.errors {
            lines.push(Line::styled(format!("error: {error}"), theme::error()));
        }
        for warning in &validation.warnings {
            lines.push(Line::styled(format!("warning: {warning}"), theme::warning()));
        }
        for suggestion in &validation.suggestions {
            lines.push(Line::styled(format!("suggestion: {suggestion}"), theme::info()));
        }

        let validation_block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded)
            .title("Validation")
            .title_style(theme::title());
        f.render_widget(Paragraph::new(lines).block(validation_block), chunks[2]);
    }

    fn render_execution(&mut self, f: &mut Frame<'_>, area: Rect) {
        let Some((outcome, query_type)) = &self.execution else {
            return;
        };
        let query_type = *query_type;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(area);

        let summary = match outcome {
            ExecutionOutcome::Scalar(_) => Line::from(vec![
                Span::styled(format!(" {} ", query_type.label()), theme::badge()),
            ]),
            ExecutionOutcome::Rowset(rows) => Line::from(vec![
                Span::styled(format!(" {} ", query_type.label()), theme::badge()),
                Span::raw("  "),
                Span::styled(
                    format!("Query executed successfully. {} row(s) returned.", rows.len()),
                    theme::success(),
                ),
            ]),
            ExecutionOutcome::Empty => Line::from(vec![
                Span::styled(format!(" {} ", query_type.label()), theme::badge()),
                Span::raw("  "),
                Span::styled("Query executed successfully. No results returned.", theme::info()),
            ]),
        };
        f.render_widget(Paragraph::new(summary), chunks[0]);

        match outcome {
            ExecutionOutcome::Scalar(message) => {
                let style = match severity_hint(message) {
                    MessageSeverity::Success => theme::success(),
                    MessageSeverity::Warning => theme::warning(),
                    MessageSeverity::Info => theme::info(),
                };
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::border_normal())
                    .border_type(BorderType::Rounded)
                    .title("Execution Results")
                    .title_style(theme::title());
                f.render_widget(
                    Paragraph::new(Span::styled(message.clone(), style)).block(block).wrap(Wrap { trim: false }),
                    chunks[1],
                );
            },
            ExecutionOutcome::Rowset(rows) => {
                let rows = rows.clone();
                self.render_rowset(f, chunks[1], &rows, "Execution Results");
            },
            ExecutionOutcome::Empty => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::border_normal())
                    .border_type(BorderType::Rounded)
                    .title("Execution Results")
                    .title_style(theme::title());
                f.render_widget(Paragraph::new("No results returned.").block(block), chunks[1]);
            },
        }
    }

    fn render_rowset(&self, f: &mut Frame<'_>, area: Rect, rows: &[crate::api::models::Row], title: &str) {
        let Some(first) = rows.first() else {
            return;
        };

        let headers: Vec<&str> = first.keys().map(String::as_str).collect();
        let header_row = Row::new(headers.iter().copied().map(header_cell)).height(1);

        let body = rows.iter().map(|row| {
            Row::new(headers.iter().map(|header| Cell::from(format_cell(row.get(*header)))))
        });

        let widths = vec![Constraint::Ratio(1, headers.len().max(1) as u32); headers.len()];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded)
            .title(title.to_string())
            .title_style(theme::title());

        let table = Table::new(body, widths)
            .header(header_row)
            .block(block)
            .row_highlight_style(theme::selected());

        let mut table_state = TableState::default().with_selected(Some(self.result_row_index.min(rows.len() - 1)));
        f.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_schema(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_normal())
            .border_type(BorderType::Rounded)
            .title("Database Schema")
            .title_style(theme::title());

        let Some(schema) = &self.schema else {
            f.render_widget(Paragraph::new("No schema information available.").block(block), area);
            return;
        };

        if schema.is_empty() {
            f.render_widget(Paragraph::new("No schema information available.").block(block), area);
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        if !schema.tables.is_empty() {
            lines.push(Line::styled("Tables", theme::header()));
            for table in &schema.tables {
                lines.push(Line::styled(format!("  {}.{}", table.schema, table.name), theme::selected()));
                for column in &table.columns {
                    lines.push(Line::raw(format!(
                        "    {:<24} {:<20} {:<8} {}",
                        column.column_name,
                        column.data_type,
                        column.is_nullable,
                        column.column_default.as_deref().unwrap_or("NULL"),
                    )));
                }
            }
        }
        if !schema.views.is_empty() {
            lines.push(Line::styled("Views", theme::header()));
            for view in &schema.views {
                lines.push(Line::raw(format!("  {}.{}", view.view_schema, view.view_name)));
            }
        }
        if !schema.functions.is_empty() {
            lines.push(Line::styled("Functions", theme::header()));
            for function in &schema.functions {
                lines.push(Line::raw(format!("  {}.{}", function.function_schema, function.function_name)));
            }
        }

        f.render_widget(Paragraph::new(lines).block(block).scroll((self.schema_scroll, 0)), area);
    }

    fn render_browser(&mut self, f: &mut Frame<'_>, area: Rect, subview: BrowserSubview) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);

        self.render_table_list(f, chunks[0]);

        match subview {
            BrowserSubview::List => {
                let block = detail_block("Database Browser", self.selection.as_ref().map(super::BrowserSelection::qualified_name));
                f.render_widget(
                    Paragraph::new("Select a table to view its structure or data.")
                        .block(block)
                        .alignment(Alignment::Center),
                    chunks[1],
                );
            },
            BrowserSubview::Structure => self.render_structure(f, chunks[1]),
            BrowserSubview::Data => self.render_page(f, chunks[1]),
        }
    }

    fn render_table_list(&self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == ComponentKind::Browser;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused { theme::border_focused() } else { theme::border_normal() })
            .border_type(BorderType::Rounded)
            .title("Tables")
            .title_style(theme::title());

        if self.tables.is_empty() {
            let notice = self.browser_notice.as_deref().unwrap_or("Loading tables...");
            f.render_widget(Paragraph::new(notice).block(block).style(theme::muted()), area);
            return;
        }

        let items: Vec<ListItem> = self
            .tables
            .iter()
            .map(|table| {
                ListItem::new(format!("{}.{} ({})", table.table_schema, table.table_name, table.column_count))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(theme::selected());
        let mut state = ListState::default();
        state.select(Some(self.selected_table_index.min(self.tables.len() - 1)));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn render_structure(&self, f: &mut Frame<'_>, area: Rect) {
        let block = detail_block("Structure", self.selection.as_ref().map(super::BrowserSelection::qualified_name));

        if self.structure.is_empty() {
            let notice = self.browser_notice.as_deref().unwrap_or("Loading structure...");
            f.render_widget(Paragraph::new(notice).block(block).style(theme::muted()), area);
            return;
        }

        let header = Row::new([
            header_cell("Column"),
            header_cell("Type"),
            header_cell("Nullable"),
            header_cell("Default"),
            header_cell("PK"),
        ])
        .height(1);

        let rows = self.structure.iter().map(|column| {
            let name = if column.is_primary_key {
                format!("{} [PK]", column.column_name)
            } else {
                column.column_name.clone()
            };
            Row::new([
                Cell::from(name),
                Cell::from(column.display_type()),
                Cell::from(if column.is_nullable == "YES" { "Yes" } else { "No" }),
                Cell::from(column.column_default.clone().unwrap_or_default()),
                Cell::from(if column.is_primary_key { "Yes" } else { "No" }),
            ])
        });

        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(12),
            Constraint::Percentage(23),
            Constraint::Percentage(10),
        ];
        f.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn render_page(&mut self, f: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        if self.page_rows.is_empty() {
            let block = detail_block("Data", self.selection.as_ref().map(super::BrowserSelection::qualified_name));
            let notice = self.browser_notice.as_deref().unwrap_or("Loading data...");
            f.render_widget(Paragraph::new(notice).block(block).style(theme::muted()), chunks[0]);
        } else {
            let rows = self.page_rows.clone();
            let title = self
                .selection
                .as_ref()
                .map(|s| format!("Data - {}", s.qualified_name()))
                .unwrap_or_else(|| "Data".to_string());
            self.render_rowset(f, chunks[0], &rows, &title);
        }

        let mut spans = vec![Span::styled(self.page.summary(), theme::info())];
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(
                "[p] prev{}  [n] next{}  [l] page size: {}",
                if self.page.can_retreat() { "" } else { " (off)" },
                if self.page.can_advance() { "" } else { " (off)" },
                self.page.limit,
            ),
            theme::muted(),
        ));
        f.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
    }

    fn render_status_line(&self, f: &mut Frame<'_>, area: Rect) {
        let text = if let Some((message, _)) = &self.status_message {
            Span::styled(message.clone(), theme::success())
        } else {
            let hint = match self.focus {
                ComponentKind::Prompt => "Enter: generate  Esc: leave prompt",
                ComponentKind::Results => "i: edit prompt  e: execute  c: export csv  q: quit",
                ComponentKind::Browser => "Enter: select  s: structure  d: data  r: refresh  Esc: close",
            };
            Span::styled(hint, theme::muted())
        };
        f.render_widget(Paragraph::new(Line::from(text)), area);
    }

    fn render_notification(&self, f: &mut Frame<'_>) {
        let Some(notification) = &self.notification else {
            return;
        };

        let area = centered_rect(60, 20, f.area());
        f.render_widget(Clear, area);

        let failed = notification.title.contains("Error") || notification.title.contains("Failed");
        let block = Block::default()
            .title(notification.title.clone())
            .borders(Borders::ALL)
            .border_style(if failed { theme::error() } else { theme::border_focused() })
            .border_type(BorderType::Rounded);

        let lines = vec![
            Line::raw(notification.message.clone()),
            Line::raw(""),
            Line::styled("Press Esc to dismiss", theme::muted()),
        ];
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
    }

    fn render_help(&self, f: &mut Frame<'_>) {
        if !self.show_help {
            return;
        }

        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);

        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .border_type(BorderType::Rounded);

        let lines = vec![
            Line::styled("Prompt", theme::header()),
            Line::raw("  Enter      submit prompt"),
            Line::raw("  Esc        leave the prompt line"),
            Line::styled("Results", theme::header()),
            Line::raw("  i          edit the prompt"),
            Line::raw("  e          execute the generated SQL"),
            Line::raw("  g / x      show generation / execution results"),
            Line::raw("  y / d      copy SQL / deployment script"),
            Line::raw("  s          fetch and show the schema"),
            Line::raw("  t          test the connection"),
            Line::raw("  b          open the table browser"),
            Line::raw("  c          export results to CSV"),
            Line::styled("Browser", theme::header()),
            Line::raw("  j / k      move in the table list"),
            Line::raw("  Enter      select the highlighted table"),
            Line::raw("  s / d      structure / data subview"),
            Line::raw("  n / p      next / previous page"),
            Line::raw("  l          cycle the page size"),
            Line::raw("  r          refresh the table list"),
            Line::raw("  Esc        close the browser"),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn header_cell(header: &str) -> Cell<'static> {
    Cell::from(header.chars().take(MAX_HEADER_WIDTH).collect::<String>()).style(theme::header())
}

fn detail_block(kind: &str, selected: Option<String>) -> Block<'static> {
    let title = match selected {
        Some(name) => format!("{kind} - {name}"),
        None => kind.to_string(),
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_normal())
        .border_type(BorderType::Rounded)
        .title(title)
        .title_style(theme::title())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
