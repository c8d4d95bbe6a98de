//! OperationLog: append-only record storage with a last-location index.

use crate::record::{ElementId, OperationRecord};
use std::collections::HashMap;

/// Ordered, append-only sequence of operation records.
///
/// Insertion order is the temporal order. Besides the records themselves the
/// log keeps an index of the most recent identity seen at each `(name, path)`,
/// so last-match-wins lookups don't have to scan.
#[derive(Debug, Default)]
pub struct OperationLog {
    records: Vec<OperationRecord>,
    /// path -> name -> identity of the latest record ending there.
    /// Keyed by path first so lookups can borrow `&str` keys.
    last_at: HashMap<String, HashMap<String, ElementId>>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Never fails and never validates contents.
    pub fn append(&mut self, record: OperationRecord) {
        self.last_at
            .entry(record.path.clone())
            .or_default()
            .insert(record.name.clone(), record.element_id);
        self.records.push(record);
    }

    /// All records for `id`, oldest first.
    ///
    /// Unknown ids yield an empty iterator. Call again to restart.
    pub fn records_for(&self, id: ElementId) -> impl Iterator<Item = &OperationRecord> + '_ {
        self.records.iter().filter(move |r| r.element_id == id)
    }

    /// Identity of the most recently appended record ending at `(name, path)`.
    pub fn last_at(&self, name: &str, path: &str) -> Option<ElementId> {
        self.last_at.get(path)?.get(name).copied()
    }

    /// Remove every record. Administrative reset only.
    pub fn clear(&mut self) {
        self.records.clear();
        self.last_at.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record in append order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationRecord> + '_ {
        self.records.iter()
    }
}
