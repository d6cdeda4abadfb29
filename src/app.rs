use std::sync::Arc;

use color_eyre::eyre::{anyhow, Result};
use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use crate::{
  action::Action,
  api::{HttpApiClient, Orchestrator},
  components::{workbench::Workbench, Component},
  config::Config,
  mode::Mode,
  tui,
};

pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub components: Vec<Box<dyn Component>>,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub last_tick_key_events: Vec<KeyEvent>,
  orchestrator: Orchestrator,
}

static SERVERS: &[u8] = include_bytes!("../config.toml");

impl App {
  pub fn new(tick_rate: f64, frame_rate: f64, cli_args: &crate::cli::Cli) -> Result<Self> {
    let mut config = Config::new()?;
    if let Some(page_size) = cli_args.page_size {
      config.browser.page_size = page_size.max(1);
    }

    let servers_config = std::str::from_utf8(SERVERS)?;
    let servers_config = toml::from_str::<toml::Value>(servers_config)?;
    let servers =
      servers_config.get("servers").and_then(|v| v.as_array()).ok_or_else(|| anyhow!("No servers found in config.toml"))?;

    let base_url = cli_args.build_server_url(servers).map_err(|e| anyhow!("Failed to resolve server URL: {}", e))?;
    log::info!("Using SQL assistant service at {base_url}");

    let client = Arc::new(HttpApiClient::new(base_url));
    let orchestrator = Orchestrator::new(client);

    let workbench = Workbench::new_with_config(Some(config.clone()));
    let mode = Mode::Prompt;

    Ok(Self {
      tick_rate,
      frame_rate,
      components: vec![Box::new(workbench)],
      should_quit: false,
      should_suspend: false,
      config,
      mode,
      last_tick_key_events: Vec::new(),
      orchestrator,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
    tui.enter()?;

    for component in self.components.iter_mut() {
      component.register_action_handler(action_tx.clone())?;
    }

    for component in self.components.iter_mut() {
      component.register_config_handler(self.config.clone())?;
    }

    for component in self.components.iter_mut() {
      component.init(Rect::default())?;
    }

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => {
            if let Some(keymap) = self.config.keybindings.get(&self.mode) {
              if let Some(action) = keymap.get(&vec![key]) {
                log::info!("Got action: {action:?}");
                action_tx.send(action.clone())?;
              } else {
                // If the key was not handled as a single key action,
                // then consider it for multi-key combinations.
                self.last_tick_key_events.push(key);

                // Check for multi-key combinations
                if let Some(action) = keymap.get(&self.last_tick_key_events) {
                  log::info!("Got action: {action:?}");
                  action_tx.send(action.clone())?;
                }
              }
            };
          },
          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.handle_events(Some(e.clone()))? {
            action_tx.send(action)?;
          }
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }

        // Only the most recent call per slot may touch state; a superseded
        // response still settles the busy count but is dropped here.
        if let Some((slot, token)) = action.completion_slot() {
          let fresh = self.orchestrator.accept(slot, token);
          if self.orchestrator.idle() {
            action_tx.send(Action::SetBusy(false))?;
          }
          if !fresh {
            log::debug!("discarding stale {slot:?} response (token {token})");
            continue;
          }
        }

        match action {
          Action::Tick => {
            self.last_tick_key_events.drain(..);
          },
          Action::Quit => self.should_quit = true,
          Action::Suspend => self.should_suspend = true,
          Action::Resume => self.should_suspend = false,
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            tui.draw(|f| {
              for component in self.components.iter_mut() {
                let r = component.draw(f, f.area());
                if let Err(e) = r {
                  action_tx.send(Action::Error(format!("Failed to draw: {e:?}"))).unwrap();
                }
              }
            })?;
          },
          Action::Render => {
            tui.draw(|f| {
              for component in self.components.iter_mut() {
                let r = component.draw(f, f.area());
                if let Err(e) = r {
                  action_tx.send(Action::Error(format!("Failed to draw: {e:?}"))).unwrap();
                }
              }
            })?;
          },

          // Focus follows the panel the user is acting on.
          Action::FocusPrompt => self.mode = Mode::Prompt,
          Action::FocusResults => self.mode = Mode::Results,
          Action::OpenBrowser => self.mode = Mode::Browser,
          Action::CloseBrowser => self.mode = Mode::Results,

          // Network actions, one slot each.
          Action::GeneratePlan(ref prompt) => {
            self.mode = Mode::Results;
            self.orchestrator.generate(prompt.clone(), &action_tx);
          },
          Action::ExecuteSql(ref query) => {
            self.orchestrator.execute(query.clone(), &action_tx);
          },
          Action::TestConnection => {
            self.orchestrator.test_connection(&action_tx);
          },
          Action::FetchSchema => {
            self.orchestrator.fetch_schema(&action_tx);
          },
          Action::FetchTables => {
            self.orchestrator.list_tables(&action_tx);
          },
          Action::FetchStructure { ref table, ref schema } => {
            self.orchestrator.table_structure(table.clone(), schema.clone(), &action_tx);
          },
          Action::FetchPage { ref table, ref schema, limit, offset } => {
            self.orchestrator.table_page(table.clone(), schema.clone(), limit, offset, &action_tx);
          },
          _ => {},
        }

        for component in self.components.iter_mut() {
          if let Some(action) = component.update(action.clone())? {
            action_tx.send(action)?
          };
        }
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }
}
