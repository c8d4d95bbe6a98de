//! HistoryService: resolves observed mutations to logical identities.
//!
//! The filesystem offers no stable handle for an entry, so identity is
//! recovered from the log itself: the source of a rename or move is whichever
//! identity was last recorded at that exact name and path. An entry seen for
//! the first time mid-life gets a backfilled `Create` at the current position
//! in the log, so resolution never fails.

use crate::config::{DeleteLookup, HistoryConfig};
use crate::events::{EventBus, HistoryEvent};
use crate::log::OperationLog;
use crate::record::{ElementId, Entry, OperationKind, OperationRecord};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Full lifecycle trace of one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    /// Identity the queried entry resolved to.
    pub element_id: ElementId,
    /// Every record for that identity, oldest first.
    pub records: Vec<OperationRecord>,
}

impl History {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the trace ends in a delete.
    pub fn is_deleted(&self) -> bool {
        self.records
            .last()
            .is_some_and(|r| r.kind == OperationKind::Delete)
    }
}

/// Log plus id counter. Always mutated together under one lock.
struct State {
    log: OperationLog,
    next_id: u64,
}

impl State {
    fn mint(&mut self) -> ElementId {
        let id = ElementId::from(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn append(&mut self, record: OperationRecord, synthesized: bool, out: &mut Vec<HistoryEvent>) {
        tracing::debug!("Recorded {}", record);
        out.push(HistoryEvent::Recorded {
            record: record.clone(),
            synthesized,
        });
        self.log.append(record);
    }

    fn create(
        &mut self,
        name: &str,
        path: &str,
        synthesized: bool,
        out: &mut Vec<HistoryEvent>,
    ) -> ElementId {
        let id = self.mint();
        self.append(OperationRecord::create(id, name, path), synthesized, out);
        id
    }

    /// Last identity recorded at `(name, path)`, or a freshly backfilled one.
    fn find_or_create_id(
        &mut self,
        name: &str,
        path: &str,
        out: &mut Vec<HistoryEvent>,
    ) -> ElementId {
        if let Some(id) = self.log.last_at(name, path) {
            return id;
        }
        let id = self.create(name, path, true, out);
        tracing::info!("Untracked entry {} {}, backfilled create as {}", path, name, id);
        id
    }
}

/// Records filesystem mutations and reconstructs per-entry history.
///
/// Cloning shares the same log: every clone sees every record. All
/// operations are synchronous, in-memory and total.
#[derive(Clone)]
pub struct HistoryService {
    state: Arc<Mutex<State>>,
    events: Arc<EventBus>,
    config: HistoryConfig,
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryService {
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        if config.delete_lookup == DeleteLookup::SwappedArguments {
            tracing::warn!("Delete lookup uses swapped (path, name) arguments");
        }
        Self {
            state: Arc::new(Mutex::new(State {
                log: OperationLog::new(),
                next_id: config.first_id,
            })),
            events: Arc::new(EventBus::new()),
            config,
        }
    }

    /// Bus carrying a `HistoryEvent` for every appended record.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` under the lock, then deliver whatever it appended.
    ///
    /// Events are queued before the lock is released so delivery follows
    /// log order across threads.
    fn mutate<T>(&self, f: impl FnOnce(&mut State, &mut Vec<HistoryEvent>) -> T) -> T {
        let result = {
            let mut state = self.lock();
            let mut pending = Vec::new();
            let result = f(&mut state, &mut pending);
            self.events.enqueue(pending);
            result
        };
        self.events.deliver();
        result
    }

    /// Record a brand-new entry. Always mints a new identity.
    pub fn record_create(&self, name: &str, path: &str) -> ElementId {
        self.mutate(|state, out| state.create(name, path, false, out))
    }

    /// Record a rename in place. The source is `(original_name, current_path)`.
    pub fn record_rename(
        &self,
        current_name: &str,
        current_path: &str,
        original_name: &str,
    ) -> ElementId {
        self.mutate(|state, out| {
            let id = state.find_or_create_id(original_name, current_path, out);
            let record = OperationRecord::rename(id, current_name, current_path, original_name);
            state.append(record, false, out);
            id
        })
    }

    /// Record a move. The source is `(original_name, original_path)`.
    pub fn record_move(
        &self,
        current_name: &str,
        current_path: &str,
        original_name: &str,
        original_path: &str,
    ) -> ElementId {
        self.mutate(|state, out| {
            let id = state.find_or_create_id(original_name, original_path, out);
            let record = OperationRecord::moved(
                id,
                current_name,
                current_path,
                original_name,
                original_path,
            );
            state.append(record, false, out);
            id
        })
    }

    /// Record a clipboard paste. Resolves exactly like a move.
    pub fn record_paste(
        &self,
        current_name: &str,
        current_path: &str,
        original_name: &str,
        original_path: &str,
    ) -> ElementId {
        self.mutate(|state, out| {
            let id = state.find_or_create_id(original_name, original_path, out);
            let record = OperationRecord::paste(
                id,
                current_name,
                current_path,
                original_name,
                original_path,
            );
            state.append(record, false, out);
            id
        })
    }

    /// Record the removal of `entry`, located by its current name and path.
    pub fn record_delete(&self, entry: &Entry) -> ElementId {
        let swapped = self.config.delete_lookup == DeleteLookup::SwappedArguments;
        self.mutate(|state, out| {
            let id = if swapped {
                state.find_or_create_id(&entry.path, &entry.name, out)
            } else {
                state.find_or_create_id(&entry.name, &entry.path, out)
            };
            state.append(OperationRecord::delete(id, &entry.name, &entry.path), false, out);
            id
        })
    }

    /// Full history of the identity last recorded at the entry's name and path.
    ///
    /// Returns `None` when nothing was ever recorded there.
    pub fn get_history(&self, entry: &Entry) -> Option<History> {
        let state = self.lock();
        let element_id = state.log.last_at(&entry.name, &entry.path)?;
        let records = state.log.records_for(element_id).cloned().collect();
        Some(History { element_id, records })
    }

    /// Forget every record and restart the id counter.
    pub fn clear(&self) {
        self.mutate(|state, out| {
            state.log.clear();
            state.next_id = self.config.first_id;
            out.push(HistoryEvent::Cleared);
        });
        tracing::info!("History cleared");
    }

    /// Number of records in the log.
    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    /// Id the next new identity will receive.
    pub fn next_id(&self) -> ElementId {
        ElementId::from(self.lock().next_id)
    }

    /// Copy of the whole log in append order.
    pub fn snapshot(&self) -> Vec<OperationRecord> {
        self.lock().log.iter().cloned().collect()
    }
}
