//! element-history: Logical identities for filesystem entries over time.
//!
//! Paths identify entries by name and location only, so a rename or move
//! destroys identity unless something else keeps it. This crate keeps it by
//! replaying observed mutations:
//! - `OperationLog` stores an append-only sequence of `OperationRecord`s
//! - `HistoryService` resolves each mutation to an `ElementId` and answers
//!   "what happened to this entry" for a live name and path
//! - `EventBus` publishes appended records to timeline views
//!
//! # Examples
//! ```
//! use element_history::{Entry, HistoryService};
//!
//! let history = HistoryService::new();
//! history.record_create("Windows", "C:");
//! history.record_rename("Linux", "C:", "Windows");
//!
//! let trace = history.get_history(&Entry::new("Linux", "C:")).unwrap();
//! assert_eq!(trace.records.len(), 2);
//! ```

pub mod config;
pub mod events;
pub mod log;
pub mod record;
pub mod service;

pub use config::{DeleteLookup, HistoryConfig};
pub use events::{EventBus, HistoryEvent, Subscription};
pub use log::OperationLog;
pub use record::{ElementId, Entry, OperationKind, OperationRecord};
pub use service::{History, HistoryService};
