// SPDX-License-Identifier: MIT

//! `DatabaseQueue` (spec §3): one worker queue for one logical database,
//! lead or child.

use parking_lot::Mutex;

use crate::connection::ConnectionHandle;
use crate::priority::QueueKind;

pub struct QueueState<C> {
    pub persistent_connection: Option<ConnectionHandle<C>>,
    pub is_connected: bool,
    pub shutdown_requested: bool,
    pub latest_available: u64,
    pub latest_loaded: u64,
    pub latest_applied: u64,
    pub last_connection_attempt_ms: Option<u64>,
    pub last_heartbeat_ms: Option<u64>,
    pub initial_connection_attempted: bool,
}

impl<C> Default for QueueState<C> {
    fn default() -> Self {
        Self {
            persistent_connection: None,
            is_connected: false,
            shutdown_requested: false,
            latest_available: 0,
            latest_loaded: 0,
            latest_applied: 0,
            last_connection_attempt_ms: None,
            last_heartbeat_ms: None,
            initial_connection_attempted: false,
        }
    }
}

/// One queue handle: `is_lead_queue ⇒ queue_number == 0` (spec §3
/// invariant 3).
pub struct DatabaseQueue<C> {
    pub database_name: String,
    pub queue_kind: QueueKind,
    pub queue_number: u32,
    pub is_lead_queue: bool,
    pub designator: String,
    state: Mutex<QueueState<C>>,
}

impl<C> DatabaseQueue<C> {
    pub fn new_lead(database_name: impl Into<String>, designator: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            queue_kind: QueueKind::Lead,
            queue_number: 0,
            is_lead_queue: true,
            designator: designator.into(),
            state: Mutex::new(QueueState::default()),
        }
    }

    pub fn new_child(
        database_name: impl Into<String>,
        queue_kind: QueueKind,
        queue_number: u32,
        designator: impl Into<String>,
    ) -> Self {
        debug_assert_ne!(queue_kind, QueueKind::Lead);
        Self {
            database_name: database_name.into(),
            queue_kind,
            queue_number,
            is_lead_queue: false,
            designator: designator.into(),
            state: Mutex::new(QueueState::default()),
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&QueueState<C>) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn with_state_mut<R>(&self, f: impl FnOnce(&mut QueueState<C>) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn request_shutdown(&self) {
        self.state.lock().shutdown_requested = true;
    }

    pub fn shutdown_requested(&self) -> bool {
        self.state.lock().shutdown_requested
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().is_connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_queue_always_has_queue_number_zero() {
        let q: DatabaseQueue<()> = DatabaseQueue::new_lead("printerdb", "printerdb:lead:0");
        assert!(q.is_lead_queue);
        assert_eq!(q.queue_number, 0);
    }

    #[test]
    fn shutdown_request_is_observable() {
        let q: DatabaseQueue<()> = DatabaseQueue::new_lead("printerdb", "printerdb:lead:0");
        assert!(!q.shutdown_requested());
        q.request_shutdown();
        assert!(q.shutdown_requested());
    }
}
