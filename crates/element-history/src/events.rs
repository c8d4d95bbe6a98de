//! Ordered event delivery for element-history.
//!
//! `HistoryService` queues a `HistoryEvent` for each appended record while it
//! still holds its state lock, so the outbox order is the log order. Delivery
//! happens after the state lock is released: whichever caller finds the
//! outbox idle drains it, and callers arriving meanwhile only queue. A
//! subscriber therefore sees events in log order even under concurrent
//! writers, and may itself query or record through the service.
//!
//! A call's events can reach subscribers after that call returns, when
//! another thread is already draining.

use crate::record::OperationRecord;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

/// Events emitted as the operation log changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryEvent {
    /// A record was appended to the log.
    Recorded {
        record: OperationRecord,
        /// True for a `Create` backfilled for an entry first seen mid-life.
        synthesized: bool,
    },
    /// The log and the id counter were reset.
    Cleared,
}

type Listener = Arc<dyn Fn(&HistoryEvent) + Send + Sync>;

/// Keeps a listener registered until dropped.
pub struct Subscription {
    bus: Weak<EventBus>,
    id: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove_listener(self.id);
        }
    }
}

#[derive(Default)]
struct Outbox {
    queue: VecDeque<HistoryEvent>,
    /// Set while some caller is draining `queue`.
    draining: bool,
}

/// Resets `draining` even if a listener panics, so the bus is not wedged.
struct DrainGuard<'a>(&'a Mutex<Outbox>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).draining = false;
    }
}

/// Fan-out of history events to listeners, in queue order.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<(usize, Listener)>>,
    next_listener: AtomicUsize,
    outbox: Mutex<Outbox>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every event delivered from now on.
    pub fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(&HistoryEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));
        Subscription {
            bus: Arc::downgrade(self),
            id,
        }
    }

    fn remove_listener(&self, id: usize) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(i, _)| *i != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Append events to the outbox. Call while holding the lock that orders them.
    pub(crate) fn enqueue(&self, events: impl IntoIterator<Item = HistoryEvent>) {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .queue
            .extend(events);
    }

    /// Deliver queued events unless another caller is already doing so.
    pub(crate) fn deliver(&self) {
        {
            let mut outbox = self.outbox.lock().unwrap_or_else(|e| e.into_inner());
            if outbox.draining || outbox.queue.is_empty() {
                return;
            }
            outbox.draining = true;
        }
        let _guard = DrainGuard(&self.outbox);

        loop {
            let next = self
                .outbox
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .queue
                .pop_front();
            let Some(event) = next else { break };

            // Snapshot so listeners may subscribe or unsubscribe mid-delivery.
            let listeners: Vec<Listener> = self
                .listeners
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect();
            for listener in listeners {
                listener(&event);
            }
        }
    }
}
