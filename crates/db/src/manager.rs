// SPDX-License-Identifier: MIT

//! C6 Database Queue Manager (spec §4.6): one `LeadQueueActor` per
//! configured database, routing by priority and owning the
//! `PendingResultRegistry` through which results are delivered.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hydrogen_core::{Clock, DatabaseConfig};
use hydrogen_wire::{QueryOutcome, QueryRequest};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::engine_driver::AnyDriver;
use crate::error::DbError;
use crate::lead_queue::{LeadQueueActor, LeadQueueHandle};
use crate::migration_source::{MigrationSource, StaticMigrationSource};
use crate::pending::PendingResultRegistry;
use crate::priority::QueuePriority;

pub struct DatabaseQueueManager<C: Clock> {
    leads: HashMap<String, LeadQueueHandle>,
    pending: Arc<PendingResultRegistry<C>>,
    receivers: Mutex<HashMap<String, oneshot::Receiver<QueryOutcome>>>,
    join_handles: Vec<JoinHandle<()>>,
}

impl<C: Clock + 'static> DatabaseQueueManager<C> {
    pub fn new(configs: Vec<DatabaseConfig>, clock: C) -> Self {
        let pending = Arc::new(PendingResultRegistry::new(clock.clone()));
        let mut leads = HashMap::new();
        let mut join_handles = Vec::new();

        for config in configs {
            let driver = AnyDriver::for_engine(config.engine);
            let source: Arc<dyn MigrationSource> = Arc::new(StaticMigrationSource(0));
            let (handle, join) = LeadQueueActor::spawn(
                config.clone(),
                driver,
                source,
                clock.clone(),
                pending.clone(),
            );
            leads.insert(config.database_name.clone(), handle);
            join_handles.push(join);
        }

        Self {
            leads,
            pending,
            receivers: Mutex::new(HashMap::new()),
            join_handles,
        }
    }

    /// Spec §4.6: selects the matching child queue by priority, enqueues
    /// the request, and allocates a `PendingResult` keyed by a freshly
    /// generated `query_id`. Returns immediately; the result is fetched
    /// separately through `await_result`.
    ///
    /// `UnknownDatabase`, `NoChildQueueForPriority`, and
    /// `BackpressureRejected` are all surfaced synchronously here — the
    /// request never reaches the pending registry unless it was actually
    /// accepted onto a child's dispatch channel.
    pub async fn submit_query(
        &self,
        database_name: &str,
        priority: QueuePriority,
        request: QueryRequest,
        ttl_ms: u64,
    ) -> Result<String, DbError> {
        let lead = self
            .leads
            .get(database_name)
            .cloned()
            .ok_or_else(|| DbError::UnknownDatabase(database_name.to_string()))?;

        let rx = lead.enqueue_to_child(priority, request)?;

        let (query_id, pending_rx) = self.pending.register(database_name, ttl_ms);
        self.receivers.lock().insert(query_id.clone(), pending_rx);

        let pending = self.pending.clone();
        let db_name = database_name.to_string();
        let qid = query_id.clone();
        tokio::spawn(async move {
            let outcome = match rx.await {
                Ok(Ok(result)) => QueryOutcome::Completed(result),
                Ok(Err(_)) | Err(_) => QueryOutcome::ResultAborted,
            };
            let _ = pending.complete(&db_name, &qid, outcome);
        });

        Ok(query_id)
    }

    /// Spec §4.6: blocks up to `timeout`; on expiry fails with
    /// `ResultTimeout`.
    pub async fn await_result(
        &self,
        query_id: &str,
        timeout: Duration,
    ) -> Result<QueryOutcome, DbError> {
        let rx = self
            .receivers
            .lock()
            .remove(query_id)
            .ok_or_else(|| DbError::UnknownQueryId(query_id.to_string()))?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(DbError::ResultTimeout),
            Err(_) => Err(DbError::ResultTimeout),
        }
    }

    /// Spec §4.6: signals every lead queue to stop, awaits their
    /// termination, then drains remaining pending results into
    /// `ResultAborted`.
    pub async fn shutdown(mut self) {
        for lead in self.leads.values() {
            lead.request_shutdown();
        }
        for join in self.join_handles.drain(..) {
            let _ = join.await;
        }
        self.pending.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::{DatabaseEngine, FakeClock};

    fn config(name: &str) -> DatabaseConfig {
        DatabaseConfig {
            database_name: name.to_string(),
            engine: DatabaseEngine::Sqlite,
            dsn: "sqlite::memory:".to_string(),
            slow_workers: 0,
            medium_workers: 0,
            fast_workers: 0,
            cache_workers: 0,
            heartbeat_interval_ms: 5_000,
            dispatch_batch: 16,
            pending_result_ttl_ms: 30_000,
            prepared_cache_capacity: 100,
        }
    }

    #[tokio::test]
    async fn submit_query_against_unknown_database_fails_fast() {
        let manager = DatabaseQueueManager::new(vec![config("printerdb")], FakeClock::new());
        let err = manager
            .submit_query(
                "ghost",
                QueuePriority::Fast,
                QueryRequest::new("SELECT 1", Default::default()),
                30_000,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownDatabase(_)));
        manager.shutdown().await;
    }

    #[tokio::test]
    async fn await_result_for_unknown_query_id_fails() {
        let manager = DatabaseQueueManager::new(vec![config("printerdb")], FakeClock::new());
        let err = manager
            .await_result("ghost", Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownQueryId(_)));
        manager.shutdown().await;
    }

    #[tokio::test]
    async fn submit_query_with_no_configured_workers_fails_fast() {
        // `config()` configures zero workers for every priority, so there
        // is no child queue to dispatch to: `submit_query` must fail
        // synchronously with `NoChildQueueForPriority` rather than
        // allocating a pending slot that nothing will ever complete.
        let manager = DatabaseQueueManager::new(vec![config("printerdb")], FakeClock::new());
        let err = manager
            .submit_query(
                "printerdb",
                QueuePriority::Fast,
                QueryRequest::new("SELECT 1", Default::default()),
                30_000,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NoChildQueueForPriority(_)));
        manager.shutdown().await;
    }
}
