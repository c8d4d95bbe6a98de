//! Apply script steps to a `HistoryService` and render query results.

use crate::script::Step;
use element_history::{
    ElementId, Entry, History, HistoryEvent, HistoryService, OperationRecord, Subscription,
};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Result of one `history` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub entry: Entry,
    /// `None` when nothing was ever recorded at the entry's location.
    pub history: Option<History>,
}

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per query
    #[default]
    Json,
    /// Indented timeline lines
    Text,
}

/// JSON shape of a query result. Unknown entries carry nulls, tracked
/// entries always carry at least one record.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryJson<'a> {
    name: &'a str,
    path: &'a str,
    element_id: Option<ElementId>,
    records: Option<&'a [OperationRecord]>,
}

/// Drives a `HistoryService` from script steps.
pub struct Replayer {
    service: HistoryService,
    synthesized: Arc<AtomicUsize>,
    _subscription: Subscription,
}

impl Replayer {
    pub fn new(service: HistoryService) -> Self {
        let synthesized = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&synthesized);
        let subscription = service.events().subscribe(move |event| {
            if let HistoryEvent::Recorded {
                synthesized: true, ..
            } = event
            {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
        Self {
            service,
            synthesized,
            _subscription: subscription,
        }
    }

    pub fn service(&self) -> &HistoryService {
        &self.service
    }

    /// Number of backfilled creates seen since this replayer was built.
    pub fn synthesized_count(&self) -> usize {
        self.synthesized.load(Ordering::Relaxed)
    }

    /// Apply one step. Only `history` steps produce an outcome.
    pub fn apply(&self, step: &Step) -> Option<QueryOutcome> {
        match step {
            Step::Create { name, path } => {
                self.service.record_create(name, path);
            }
            Step::Rename {
                current_name,
                current_path,
                original_name,
            } => {
                self.service
                    .record_rename(current_name, current_path, original_name);
            }
            Step::Move {
                current_name,
                current_path,
                original_name,
                original_path,
            } => {
                self.service
                    .record_move(current_name, current_path, original_name, original_path);
            }
            Step::Paste {
                current_name,
                current_path,
                original_name,
                original_path,
            } => {
                self.service
                    .record_paste(current_name, current_path, original_name, original_path);
            }
            Step::Delete { name, path } => {
                self.service.record_delete(&Entry::new(name.as_str(), path.as_str()));
            }
            Step::History { name, path } => {
                let entry = Entry::new(name.as_str(), path.as_str());
                let history = self.service.get_history(&entry);
                if history.is_none() {
                    tracing::debug!("No history for {} {}", path, name);
                }
                return Some(QueryOutcome { entry, history });
            }
            Step::Clear => self.service.clear(),
        }
        None
    }

    /// Apply every step in order, collecting query outcomes.
    pub fn run(&self, steps: &[Step]) -> Vec<QueryOutcome> {
        steps.iter().filter_map(|step| self.apply(step)).collect()
    }
}

/// Write outcomes in the requested format, one query per block or line.
pub fn write_outcomes<W: Write>(
    out: &mut W,
    outcomes: &[QueryOutcome],
    format: OutputFormat,
) -> io::Result<()> {
    for outcome in outcomes {
        match format {
            OutputFormat::Json => {
                let json = QueryJson {
                    name: &outcome.entry.name,
                    path: &outcome.entry.path,
                    element_id: outcome.history.as_ref().map(|h| h.element_id),
                    records: outcome.history.as_ref().map(|h| h.records.as_slice()),
                };
                serde_json::to_writer(&mut *out, &json)?;
                writeln!(out)?;
            }
            OutputFormat::Text => match &outcome.history {
                Some(history) => {
                    writeln!(
                        out,
                        "{} {} ({})",
                        outcome.entry.path, outcome.entry.name, history.element_id
                    )?;
                    for record in &history.records {
                        writeln!(out, "  {}", record)?;
                    }
                }
                None => {
                    writeln!(out, "{} {}", outcome.entry.path, outcome.entry.name)?;
                    writeln!(out, "  (no history)")?;
                }
            },
        }
    }
    Ok(())
}
