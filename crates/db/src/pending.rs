// SPDX-License-Identifier: MIT

//! C8 Pending Result Registry: maps `query_id -> PendingResult` scoped
//! per designator (spec §4.8). A single lock guards the map; delivery
//! itself rides `tokio::sync::oneshot`, a lock-free one-shot primitive,
//! so producers never block on waiters.

use std::collections::HashMap;

use hydrogen_core::{generate_query_id, Clock};
use hydrogen_wire::QueryOutcome;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::DbError;

struct Slot {
    created_at_ms: u64,
    ttl_ms: u64,
    sender: Option<oneshot::Sender<QueryOutcome>>,
}

#[derive(Default)]
struct Designator {
    slots: HashMap<String, Slot>,
}

/// Generic over the clock implementation (`SystemClock` in production,
/// `FakeClock` in tests) rather than a trait object: `Clock` carries
/// `Clone` as a supertrait and so is not object-safe.
pub struct PendingResultRegistry<C: Clock> {
    clock: C,
    by_designator: Mutex<HashMap<String, Designator>>,
}

impl<C: Clock> PendingResultRegistry<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            by_designator: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate a fresh `query_id` and its one-shot receiver.
    pub fn register(&self, designator: &str, ttl_ms: u64) -> (String, oneshot::Receiver<QueryOutcome>) {
        let query_id = generate_query_id();
        let (tx, rx) = oneshot::channel();
        let mut table = self.by_designator.lock();
        let entry = table.entry(designator.to_string()).or_default();
        entry.slots.insert(
            query_id.clone(),
            Slot {
                created_at_ms: self.clock.epoch_ms(),
                ttl_ms,
                sender: Some(tx),
            },
        );
        (query_id, rx)
    }

    /// Deliver `outcome` to `query_id`'s waiter, if it still exists.
    pub fn complete(
        &self,
        designator: &str,
        query_id: &str,
        outcome: QueryOutcome,
    ) -> Result<(), DbError> {
        let mut table = self.by_designator.lock();
        let Some(entry) = table.get_mut(designator) else {
            return Err(DbError::UnknownQueryId(query_id.to_string()));
        };
        let Some(mut slot) = entry.slots.remove(query_id) else {
            return Err(DbError::UnknownQueryId(query_id.to_string()));
        };
        if let Some(sender) = slot.sender.take() {
            let _ = sender.send(outcome);
        }
        Ok(())
    }

    /// Remove every entry for `designator` whose TTL has elapsed,
    /// delivering `ResultTimeout` to any waiter still parked. Returns the
    /// number evicted.
    pub fn cleanup_expired(&self, designator: &str) -> usize {
        let now = self.clock.epoch_ms();
        let mut table = self.by_designator.lock();
        let Some(entry) = table.get_mut(designator) else {
            return 0;
        };
        let expired: Vec<String> = entry
            .slots
            .iter()
            .filter(|(_, slot)| now >= slot.created_at_ms.saturating_add(slot.ttl_ms))
            .map(|(id, _)| id.clone())
            .collect();
        let count = expired.len();
        for id in expired {
            if let Some(mut slot) = entry.slots.remove(&id) {
                if let Some(sender) = slot.sender.take() {
                    let _ = sender.send(QueryOutcome::ResultTimeout);
                }
            }
        }
        if count > 0 {
            debug!(designator, count, "evicted expired pending results");
        }
        count
    }

    /// Drain every slot across every designator, delivering
    /// `ResultAborted` (spec §4.6 `shutdown()`).
    pub fn abort_all(&self) {
        let mut table = self.by_designator.lock();
        for entry in table.values_mut() {
            for (_, mut slot) in entry.slots.drain() {
                if let Some(sender) = slot.sender.take() {
                    let _ = sender.send(QueryOutcome::ResultAborted);
                }
            }
        }
    }
}
