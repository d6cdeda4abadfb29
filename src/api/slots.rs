use std::{collections::HashMap, sync::Arc};

use tokio::sync::mpsc::UnboundedSender;

use super::{ApiClient, Slot};
use crate::action::Action;

/// Per-slot call tokens plus the outstanding-call count backing the busy
/// indicator. All bookkeeping happens on the app loop's thread; spawned
/// tasks only carry their token back in the completion action.
#[derive(Debug, Default)]
pub struct CallSlots {
  latest: HashMap<Slot, u64>,
  outstanding: usize,
}

impl CallSlots {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a new call on the slot and returns its token. Any earlier
  /// call on the same slot is superseded from this point on.
  pub fn begin(&mut self, slot: Slot) -> u64 {
    let token = self.latest.entry(slot).or_insert(0);
    *token += 1;
    self.outstanding += 1;
    *token
  }

  /// Settles a completed call. Returns true iff the token is still the
  /// slot's latest, i.e. the response is allowed to mutate state.
  pub fn settle(&mut self, slot: Slot, token: u64) -> bool {
    self.outstanding = self.outstanding.saturating_sub(1);
    self.latest.get(&slot).copied() == Some(token)
  }

  pub fn outstanding(&self) -> usize {
    self.outstanding
  }
}

/// Issues one spawned task per network action and stamps each completion
/// with its slot token. There is no hard abort: superseding a call only
/// means its response will fail the token check at receipt.
pub struct Orchestrator {
  client: Arc<dyn ApiClient>,
  slots: CallSlots,
}

impl Orchestrator {
  pub fn new(client: Arc<dyn ApiClient>) -> Self {
    Self { client, slots: CallSlots::new() }
  }

  pub fn idle(&self) -> bool {
    self.slots.outstanding() == 0
  }

  /// Receipt-side gate: settles the call and reports whether its payload may
  /// be applied. Stale responses are dropped by the caller.
  pub fn accept(&mut self, slot: Slot, token: u64) -> bool {
    self.slots.settle(slot, token)
  }

  fn begin(&mut self, slot: Slot, tx: &UnboundedSender<Action>) -> u64 {
    let token = self.slots.begin(slot);
    if self.slots.outstanding() == 1 {
      let _ = tx.send(Action::SetBusy(true));
    }
    token
  }

  pub fn generate(&mut self, prompt: String, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::Generate, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.generate(&prompt).await;
      let _ = tx.send(Action::GenerationLoaded { token, result });
    });
  }

  pub fn execute(&mut self, query: String, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::Execute, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.execute(&query).await;
      let _ = tx.send(Action::ExecutionLoaded { token, result });
    });
  }

  pub fn test_connection(&mut self, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::TestConnection, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.test_connection().await;
      let _ = tx.send(Action::ConnectionTested { token, result });
    });
  }

  pub fn fetch_schema(&mut self, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::Schema, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.fetch_schema().await;
      let _ = tx.send(Action::SchemaLoaded { token, result });
    });
  }

  pub fn list_tables(&mut self, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::Tables, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.list_tables().await;
      let _ = tx.send(Action::TablesLoaded { token, result });
    });
  }

  pub fn table_structure(&mut self, table: String, schema: String, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::Structure, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.table_structure(&table, &schema).await;
      let _ = tx.send(Action::StructureLoaded { token, result });
    });
  }

  pub fn table_page(&mut self, table: String, schema: String, limit: u64, offset: u64, tx: &UnboundedSender<Action>) {
    let token = self.begin(Slot::Page, tx);
    let client = Arc::clone(&self.client);
    let tx = tx.clone();
    tokio::spawn(async move {
      let result = client.table_page(&table, &schema, limit, offset).await;
      let _ = tx.send(Action::PageLoaded { token, result });
    });
  }
}
