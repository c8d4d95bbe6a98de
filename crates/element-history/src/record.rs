//! Operation records: one immutable entry per observed mutation.
//!
//! A record always carries the entry's name and path *after* the operation.
//! Kinds that change the name or location also remember where the entry was
//! immediately before.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Logical identity minted for "the same entry over time".
///
/// Wraps a u64 and displays as `#<n>` in timelines. Serializes as the bare
/// integer so JSON consumers see a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ElementId> for u64 {
    fn from(id: ElementId) -> u64 {
        id.0
    }
}

/// A live entry as a caller currently observes it.
///
/// Name and path are compared with exact string equality; no separator or
/// case normalization is applied anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// File or folder name: "report.docx"
    pub name: String,
    /// Containing location: "C:\\Users\\me"
    pub path: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// What happened to the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OperationKind {
    /// Entry came into existence (observed, or backfilled on first sight).
    Create,
    /// Entry was removed. Expected to be the last record for its id.
    Delete,
    /// Name changed in place.
    Rename {
        /// Name immediately before the rename.
        original_name: String,
    },
    /// Entry was moved, possibly renamed on the way.
    Move {
        /// Name immediately before the move.
        original_name: String,
        /// Path immediately before the move.
        original_path: String,
    },
    /// A move that came through the clipboard.
    Paste {
        /// Name at the clipboard source.
        original_name: String,
        /// Path at the clipboard source.
        original_path: String,
    },
}

/// One entry in the operation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    /// Identity this record belongs to. Never changes once assigned.
    pub element_id: ElementId,
    /// Name after the operation.
    pub name: String,
    /// Path after the operation.
    pub path: String,
    #[serde(flatten)]
    pub kind: OperationKind,
}

impl OperationRecord {
    pub fn create(element_id: ElementId, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            element_id,
            name: name.into(),
            path: path.into(),
            kind: OperationKind::Create,
        }
    }

    pub fn delete(element_id: ElementId, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            element_id,
            name: name.into(),
            path: path.into(),
            kind: OperationKind::Delete,
        }
    }

    pub fn rename(
        element_id: ElementId,
        name: impl Into<String>,
        path: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            element_id,
            name: name.into(),
            path: path.into(),
            kind: OperationKind::Rename {
                original_name: original_name.into(),
            },
        }
    }

    pub fn moved(
        element_id: ElementId,
        name: impl Into<String>,
        path: impl Into<String>,
        original_name: impl Into<String>,
        original_path: impl Into<String>,
    ) -> Self {
        Self {
            element_id,
            name: name.into(),
            path: path.into(),
            kind: OperationKind::Move {
                original_name: original_name.into(),
                original_path: original_path.into(),
            },
        }
    }

    pub fn paste(
        element_id: ElementId,
        name: impl Into<String>,
        path: impl Into<String>,
        original_name: impl Into<String>,
        original_path: impl Into<String>,
    ) -> Self {
        Self {
            element_id,
            name: name.into(),
            path: path.into(),
            kind: OperationKind::Paste {
                original_name: original_name.into(),
                original_path: original_path.into(),
            },
        }
    }

    /// Whether this record left its entry at exactly `(name, path)`.
    pub fn is_at(&self, name: &str, path: &str) -> bool {
        self.name == name && self.path == path
    }

    /// Lowercase kind label, matching the serialized `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            OperationKind::Create => "create",
            OperationKind::Delete => "delete",
            OperationKind::Rename { .. } => "rename",
            OperationKind::Move { .. } => "move",
            OperationKind::Paste { .. } => "paste",
        }
    }

    /// Where the entry was before this operation, if the operation relocated it.
    ///
    /// A rename keeps its path, so the origin pairs the original name with the
    /// record's own path.
    pub fn origin(&self) -> Option<(&str, &str)> {
        match &self.kind {
            OperationKind::Create | OperationKind::Delete => None,
            OperationKind::Rename { original_name } => Some((original_name, &self.path)),
            OperationKind::Move {
                original_name,
                original_path,
            }
            | OperationKind::Paste {
                original_name,
                original_path,
            } => Some((original_name, original_path)),
        }
    }
}

impl Display for OperationRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = self.kind_name();
        match &self.kind {
            OperationKind::Create | OperationKind::Delete => {
                write!(f, "{} {} {} {}", self.element_id, kind, self.path, self.name)
            }
            OperationKind::Rename { original_name } => write!(
                f,
                "{} {} {} {} -> {}",
                self.element_id, kind, self.path, original_name, self.name
            ),
            OperationKind::Move {
                original_name,
                original_path,
            }
            | OperationKind::Paste {
                original_name,
                original_path,
            } => write!(
                f,
                "{} {} {} {} -> {} {}",
                self.element_id, kind, original_path, original_name, self.path, self.name
            ),
        }
    }
}
