//! Configuration for `HistoryService`.

/// How a delete resolves the identity of the entry it removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteLookup {
    /// Look up the entry's current `(name, path)`, like every other operation.
    #[default]
    CurrentEntry,
    /// Look up `(path, name)`, with name and path transposed. Kept for
    /// compatibility with legacy call sites: a delete of a tracked entry then
    /// misses, and backfills a `Create` with name and path swapped.
    SwappedArguments,
}

/// Service configuration.
///
/// # Examples
/// ```
/// use element_history::{DeleteLookup, HistoryConfig};
///
/// let config = HistoryConfig::new()
///     .first_id(100)
///     .delete_lookup(DeleteLookup::SwappedArguments);
/// assert_eq!(config.first_id, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Id given to the first identity, and again after every reset.
    pub first_id: u64,
    /// Identity resolution rule for deletes.
    pub delete_lookup: DeleteLookup,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            first_id: 1,
            delete_lookup: DeleteLookup::default(),
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_id(mut self, first_id: u64) -> Self {
        self.first_id = first_id;
        self
    }

    pub fn delete_lookup(mut self, delete_lookup: DeleteLookup) -> Self {
        self.delete_lookup = delete_lookup;
        self
    }
}
