// File: macrofeed-core/src/test_utils/scripted_api.rs

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use macrofeed_common::models::{MacroId, UpdateRecord};
use macrofeed_common::traits::FeedApi;

use crate::Error;

struct Scripted {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<Vec<UpdateRecord>, u16>,
}

/// In-memory backend with per-macro queues of canned answers.
///
/// A gated answer is held back until the returned sender fires, which lets a
/// test decide the order in which overlapping requests resolve. Unscripted
/// update requests answer with an empty list.
pub struct ScriptedApi {
    macros: Mutex<Result<Vec<MacroId>, u16>>,
    updates: Mutex<HashMap<String, VecDeque<Scripted>>>,
    clear_status: Mutex<Option<u16>>,
    clear_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
    clear_calls: Mutex<Vec<String>>,
}

fn status_error(status: u16, what: &str) -> Error {
    Error::Status {
        status,
        url: format!("scripted://{}", what),
    }
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            macros: Mutex::new(Ok(Vec::new())),
            updates: Mutex::new(HashMap::new()),
            clear_status: Mutex::new(None),
            clear_gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            clear_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_macros(self, macros: &[&str]) -> Self {
        *self.macros.lock().unwrap_or_else(|p| p.into_inner()) =
            Ok(macros.iter().map(|m| MacroId::from(*m)).collect());
        self
    }

    pub fn failing_macros(self, status: u16) -> Self {
        *self.macros.lock().unwrap_or_else(|p| p.into_inner()) = Err(status);
        self
    }

    fn push(&self, macro_id: &str, scripted: Scripted) {
        self.updates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(macro_id.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub fn push_updates(&self, macro_id: &str, updates: Vec<UpdateRecord>) {
        self.push(macro_id, Scripted { gate: None, result: Ok(updates) });
    }

    pub fn push_failure(&self, macro_id: &str, status: u16) {
        self.push(macro_id, Scripted { gate: None, result: Err(status) });
    }

    /// Queue an answer that stays pending until the sender is fired (or dropped).
    pub fn push_gated_updates(&self, macro_id: &str, updates: Vec<UpdateRecord>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(macro_id, Scripted { gate: Some(rx), result: Ok(updates) });
        tx
    }

    /// `Some(status)` makes clear requests fail with that status.
    pub fn set_clear_failure(&self, status: Option<u16>) {
        *self.clear_status.lock().unwrap_or_else(|p| p.into_inner()) = status;
    }

    /// Hold the next clear request until the sender is fired (or dropped).
    pub fn gate_next_clear(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.clear_gate.lock().unwrap_or_else(|p| p.into_inner()) = Some(rx);
        tx
    }

    /// Macro ids of every update-list request, in call order.
    pub fn update_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Macro ids of every clear request, in call order.
    pub fn clear_calls(&self) -> Vec<String> {
        self.clear_calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl FeedApi for ScriptedApi {
    async fn list_macros(&self) -> Result<Vec<MacroId>, Error> {
        self.macros
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .map_err(|s| status_error(s, "macros"))
    }

    async fn list_updates(&self, macro_id: &MacroId) -> Result<Vec<UpdateRecord>, Error> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(macro_id.to_string());
        let next = self
            .updates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get_mut(macro_id.as_str())
            .and_then(|q| q.pop_front());
        let Some(scripted) = next else {
            return Ok(Vec::new());
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.result.map_err(|s| status_error(s, macro_id.as_str()))
    }

    async fn clear_updates(&self, macro_id: &MacroId) -> Result<(), Error> {
        self.clear_calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(macro_id.to_string());
        let gate = self.clear_gate.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match *self.clear_status.lock().unwrap_or_else(|p| p.into_inner()) {
            Some(status) => Err(status_error(status, macro_id.as_str())),
            None => {
                if let Some(q) = self
                    .updates
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .get_mut(macro_id.as_str())
                {
                    q.clear();
                }
                Ok(())
            }
        }
    }

    async fn get_update(&self, macro_id: &MacroId, update_id: i64) -> Result<UpdateRecord, Error> {
        Err(Error::NotFound(format!("update {} for macro '{}'", update_id, macro_id)))
    }

    async fn clear_all(&self) -> Result<(), Error> {
        match *self.clear_status.lock().unwrap_or_else(|p| p.into_inner()) {
            Some(status) => Err(status_error(status, "clear-all")),
            None => {
                self.updates.lock().unwrap_or_else(|p| p.into_inner()).clear();
                Ok(())
            }
        }
    }

    async fn health(&self) -> Result<bool, Error> {
        Ok(true)
    }
}
