use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{BrowserSubview, Workbench, ViewPanel};
use crate::{action::Action, components::ComponentKind};

impl Workbench {
    pub(super) fn handle_events(&mut self, event: Option<crate::tui::Event>) -> Result<Option<Action>> {
        if let Some(crate::tui::Event::Key(key)) = event {
            self.handle_key_events(key)
        } else {
            Ok(None)
        }
    }

    pub(super) fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Modal popups swallow keys until dismissed.
        if self.notification.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.notification = None;
            }
            return Ok(None);
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return Ok(None);
        }

        match self.focus {
            // The prompt line owns plain character input; commands for this
            // mode live in the keybinding table under Mode::Prompt.
            ComponentKind::Prompt => match key.code {
                KeyCode::Enter => Ok(Some(Action::SubmitPrompt)),
                KeyCode::Esc => Ok(Some(Action::FocusResults)),
                KeyCode::Backspace => {
                    self.prompt_input.pop();
                    Ok(None)
                },
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.prompt_input.push(c);
                    Ok(None)
                },
                _ => Ok(None),
            },
            ComponentKind::Browser => match key.code {
                KeyCode::Up => Ok(Some(self.vertical_move_action(true))),
                KeyCode::Down => Ok(Some(self.vertical_move_action(false))),
                KeyCode::Enter if self.panel == ViewPanel::Browser(BrowserSubview::List) => {
                    Ok(Some(Action::SelectTable))
                },
                KeyCode::Left if self.panel == ViewPanel::Browser(BrowserSubview::Data) => {
                    Ok(Some(Action::PrevPage))
                },
                KeyCode::Right if self.panel == ViewPanel::Browser(BrowserSubview::Data) => {
                    Ok(Some(Action::NextPage))
                },
                _ => Ok(None),
            },
            ComponentKind::Results => match key.code {
                KeyCode::Up => Ok(Some(Action::RowMoveUp)),
                KeyCode::Down => Ok(Some(Action::RowMoveDown)),
                _ => Ok(None),
            },
        }
    }

    /// Arrow keys scroll the data rows while the data subview is open and
    /// move the table cursor otherwise.
    fn vertical_move_action(&self, up: bool) -> Action {
        if self.panel == ViewPanel::Browser(BrowserSubview::Data) {
            if up { Action::RowMoveUp } else { Action::RowMoveDown }
        } else if up {
            Action::TableMoveUp
        } else {
            Action::TableMoveDown
        }
    }
}
