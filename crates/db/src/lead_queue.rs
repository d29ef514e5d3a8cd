// SPDX-License-Identifier: MIT

//! C7 Lead Queue Actor (spec §4.7): one cooperative control loop per
//! configured database, owning the persistent connection and the
//! migration state machine, coordinating 0..N child queues.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hydrogen_core::{Clock, DatabaseConfig};
use hydrogen_wire::{QueryRequest, QueryResult};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::connection::{handle_connection_success, ConnectionHandle};
use crate::driver::IsolationLevel;
use crate::engine_driver::{AnyDriver, AnyHandle};
use crate::error::DbError;
use crate::migration::{determine_action, MigrationAction};
use crate::migration_source::{MigrationSource, MigrationStep};
use crate::pending::PendingResultRegistry;
use crate::priority::QueuePriority;
use crate::queue::DatabaseQueue;

/// Mirrors spec §4.7.6; transitions are driven by the actor's own loop,
/// not validated against a table the way `SubsystemState` is — a single
/// task is the only writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadQueueState {
    Inactive,
    Connecting,
    Bootstrapping,
    Migrating,
    Serving,
    Draining,
}

struct DispatchRequest {
    request: QueryRequest,
    respond_to: oneshot::Sender<Result<QueryResult, DbError>>,
}

/// Caller-facing façade for one lead queue: what the Queue Manager holds
/// and what child queues address to route work through the lead's own
/// connection when required.
#[derive(Clone)]
pub struct LeadQueueHandle {
    pub database_name: String,
    dispatch_tx: mpsc::Sender<DispatchRequest>,
    cancellation: CancellationToken,
    state: Arc<Mutex<LeadQueueState>>,
    child_dispatch: Arc<Mutex<HashMap<QueuePriority, mpsc::Sender<DispatchRequest>>>>,
    initial_connection_rx: watch::Receiver<bool>,
}

/// Waits for `rx` to carry `true`, bounded by `timeout` (spec §4.7.1 step 4,
/// §5: `await_initial_connection`). A `watch` channel, not `Notify`: the
/// receiver can always `borrow()` the latest value, so there's no
/// check-then-register window where a signal fired just before the wait
/// began would be missed.
async fn wait_for_signal(mut rx: watch::Receiver<bool>, timeout: Duration) -> Result<(), DbError> {
    let wait = async {
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    };
    if tokio::time::timeout(timeout, wait).await.is_err() {
        return Err(DbError::InitialConnectionTimeout);
    }
    if *rx.borrow() {
        Ok(())
    } else {
        Err(DbError::InitialConnectionTimeout)
    }
}

impl LeadQueueHandle {
    pub fn state(&self) -> LeadQueueState {
        *self.state.lock()
    }

    /// Blocks until the lead queue's connect cycle succeeds for the first
    /// time (spec §4.7.1 step 4, §5, glossary), or fails with
    /// `InitialConnectionTimeout`.
    pub async fn await_initial_connection(&self, timeout: Duration) -> Result<(), DbError> {
        wait_for_signal(self.initial_connection_rx.clone(), timeout).await
    }

    /// Route a query directly to the lead's own connection (spec §4.7.4):
    /// schema-introspection-style requests that must run on the lead
    /// rather than a child.
    pub async fn dispatch_to_lead(&self, request: QueryRequest) -> Result<QueryResult, DbError> {
        let (tx, rx) = oneshot::channel();
        self.dispatch_tx
            .try_send(DispatchRequest {
                request,
                respond_to: tx,
            })
            .map_err(|_| DbError::BackpressureRejected)?;
        rx.await.map_err(|_| DbError::BackpressureRejected)?
    }

    /// Enqueue onto the matching child queue's dispatch channel without
    /// waiting for the result, so `NoChildQueueForPriority` and
    /// `BackpressureRejected` (spec §4.6) surface synchronously to the
    /// caller instead of being discovered only once a spawned delivery
    /// task gets around to awaiting them.
    pub fn enqueue_to_child(
        &self,
        priority: QueuePriority,
        request: QueryRequest,
    ) -> Result<oneshot::Receiver<Result<QueryResult, DbError>>, DbError> {
        let sender = {
            let table = self.child_dispatch.lock();
            table
                .get(&priority)
                .cloned()
                .ok_or(DbError::NoChildQueueForPriority(priority))?
        };
        let (tx, rx) = oneshot::channel();
        sender
            .try_send(DispatchRequest {
                request,
                respond_to: tx,
            })
            .map_err(|_| DbError::BackpressureRejected)?;
        Ok(rx)
    }

    /// Route a query to the matching child queue's dispatch channel and
    /// wait for its result.
    pub async fn dispatch_to_child(
        &self,
        priority: QueuePriority,
        request: QueryRequest,
    ) -> Result<QueryResult, DbError> {
        let rx = self.enqueue_to_child(priority, request)?;
        rx.await.map_err(|_| DbError::BackpressureRejected)?
    }

    /// Retire a child queue of the given priority (spec §4.7.5).
    /// `NotLeadQueue` never actually triggers here since a `LeadQueueHandle`
    /// only ever fronts a lead queue; the check is kept to mirror the
    /// source operation's documented preconditions.
    pub fn shutdown_child_queue(&self, priority: Option<QueuePriority>) -> Result<(), DbError> {
        let Some(priority) = priority else {
            return Err(DbError::NullQueueType);
        };
        let mut table = self.child_dispatch.lock();
        if table.remove(&priority).is_none() {
            return Err(DbError::NullQueue);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.cancellation.cancel();
    }
}

/// One configured child worker: owns no persistent connection, opens one
/// per request (spec §4.7.5: "opened on demand, closed on idle").
async fn run_child_queue(
    priority: QueuePriority,
    designator: String,
    config: Arc<DatabaseConfig>,
    driver: Arc<AnyDriver>,
    mut dispatch_rx: mpsc::Receiver<DispatchRequest>,
    cancellation: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancellation.cancelled() => {
                debug!(designator, "child queue retiring");
                return;
            }
            maybe_req = dispatch_rx.recv() => {
                let Some(DispatchRequest { request, respond_to }) = maybe_req else {
                    return;
                };
                let outcome = match driver.connect(&config, &designator).await {
                    Ok(handle) => {
                        let result = driver.execute_query(&handle, &request).await;
                        let _ = driver.disconnect(handle).await;
                        result.map_err(DbError::from)
                    }
                    Err(e) => Err(DbError::Driver(e)),
                };
                let _ = respond_to.send(outcome);
            }
        }
    }
}

/// The lead queue's own control loop. Generic over `Clock` so tests can
/// drive `PendingResultRegistry` TTL expiry deterministically.
pub struct LeadQueueActor<C: Clock> {
    database_name: String,
    designator: String,
    config: Arc<DatabaseConfig>,
    driver: Arc<AnyDriver>,
    migration_source: Arc<dyn MigrationSource>,
    clock: C,
    pending: Arc<PendingResultRegistry<C>>,
    queue: Arc<DatabaseQueue<AnyHandle>>,
    state: Arc<Mutex<LeadQueueState>>,
    dispatch_rx: mpsc::Receiver<DispatchRequest>,
    cancellation: CancellationToken,
    bootstrapped: bool,
    child_handles: HashMap<QueuePriority, (mpsc::Sender<DispatchRequest>, CancellationToken)>,
    child_dispatch: Arc<Mutex<HashMap<QueuePriority, mpsc::Sender<DispatchRequest>>>>,
    initial_connection_tx: watch::Sender<bool>,
    /// Manifests cached by the last `Load` action, awaiting `Apply`.
    loaded_steps: Vec<MigrationStep>,
}

const DISPATCH_CHANNEL_CAPACITY: usize = 256;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);

impl<C: Clock> LeadQueueActor<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        config: DatabaseConfig,
        driver: AnyDriver,
        migration_source: Arc<dyn MigrationSource>,
        clock: C,
        pending: Arc<PendingResultRegistry<C>>,
    ) -> (LeadQueueHandle, tokio::task::JoinHandle<()>)
    where
        C: 'static,
    {
        let (dispatch_tx, dispatch_rx) = mpsc::channel(DISPATCH_CHANNEL_CAPACITY);
        let cancellation = CancellationToken::new();
        let state = Arc::new(Mutex::new(LeadQueueState::Inactive));
        let child_dispatch = Arc::new(Mutex::new(HashMap::new()));
        let designator = hydrogen_core::generate_designator(&config.database_name, "lead", 0);
        let database_name = config.database_name.clone();
        let (initial_connection_tx, initial_connection_rx) = watch::channel(false);

        let actor = LeadQueueActor {
            database_name: database_name.clone(),
            designator,
            config: Arc::new(config),
            driver: Arc::new(driver),
            migration_source,
            clock,
            pending,
            queue: Arc::new(DatabaseQueue::new_lead(
                database_name.clone(),
                hydrogen_core::generate_designator(&database_name, "lead", 0),
            )),
            state: state.clone(),
            dispatch_rx,
            cancellation: cancellation.clone(),
            bootstrapped: false,
            child_handles: HashMap::new(),
            child_dispatch: child_dispatch.clone(),
            initial_connection_tx,
            loaded_steps: Vec::new(),
        };

        let join = tokio::spawn(actor.run());

        let handle = LeadQueueHandle {
            database_name,
            dispatch_tx,
            cancellation,
            state,
            child_dispatch,
            initial_connection_rx,
        };
        (handle, join)
    }

    async fn run(mut self) {
        self.spawn_child_queues();

        loop {
            if self.cancellation.is_cancelled() {
                self.drain().await;
                return;
            }

            if !self.queue.is_connected() {
                *self.state.lock() = LeadQueueState::Connecting;
                if !self.connect_cycle().await {
                    tokio::select! {
                        _ = tokio::time::sleep(CONNECT_BACKOFF) => {}
                        _ = self.cancellation.cancelled() => {}
                    }
                    continue;
                }
            }

            if !self.bootstrapped {
                *self.state.lock() = LeadQueueState::Bootstrapping;
                if self.bootstrap().await.is_err() {
                    tokio::select! {
                        _ = tokio::time::sleep(CONNECT_BACKOFF) => {}
                        _ = self.cancellation.cancelled() => {}
                    }
                    continue;
                }
                self.bootstrapped = true;
            }

            *self.state.lock() = LeadQueueState::Migrating;
            self.run_migration_cycle().await;

            *self.state.lock() = LeadQueueState::Serving;
            self.serve_one_cycle().await;
        }
    }

    fn spawn_child_queues(&mut self) {
        let counts = [
            (QueuePriority::Slow, self.config.slow_workers),
            (QueuePriority::Medium, self.config.medium_workers),
            (QueuePriority::Fast, self.config.fast_workers),
            (QueuePriority::Cache, self.config.cache_workers),
        ];
        for (priority, count) in counts {
            if count == 0 {
                continue;
            }
            let (tx, rx) = mpsc::channel(DISPATCH_CHANNEL_CAPACITY);
            let child_cancellation = CancellationToken::new();
            let designator = format!("{}:{:?}", self.database_name, priority);
            tokio::spawn(run_child_queue(
                priority,
                designator,
                self.config.clone(),
                self.driver.clone(),
                rx,
                child_cancellation.clone(),
            ));
            self.child_handles
                .insert(priority, (tx.clone(), child_cancellation));
            self.child_dispatch.lock().insert(priority, tx);
        }
    }

    /// Spec §4.7.1: connect, sentinel-check, health-check.
    async fn connect_cycle(&mut self) -> bool {
        let raw = match self.driver.connect(&self.config, &self.designator).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(designator = %self.designator, error = %e, "lead queue connect failed");
                self.queue.with_state_mut(|s| {
                    s.last_connection_attempt_ms = Some(self.clock.epoch_ms());
                });
                return false;
            }
        };
        let connection = ConnectionHandle::new(raw);
        if !handle_connection_success(&connection) {
            error!(designator = %self.designator, "rejected corrupted connection handle");
            return false;
        }
        if !self.driver.health_check(&connection.conn).await {
            warn!(designator = %self.designator, "health check failed after connect");
            let _ = self.driver.disconnect(connection.conn).await;
            self.queue.with_state_mut(|s| s.is_connected = false);
            return false;
        }

        let was_connected = self.queue.is_connected();
        self.queue.with_state_mut(|s| {
            s.persistent_connection = Some(connection);
            s.is_connected = true;
            s.initial_connection_attempted = true;
        });
        if !was_connected {
            info!(designator = %self.designator, "initial connection established");
            let _ = self.initial_connection_tx.send(true);
        }
        true
    }

    /// Spec §4.7.2: idempotent bootstrap SQL, once per actor lifetime.
    async fn bootstrap(&self) -> Result<(), DbError> {
        let request = QueryRequest::new(
            "CREATE TABLE IF NOT EXISTS hydrogen_migrations (version BIGINT NOT NULL)",
            Default::default(),
        );
        self.with_connection(|driver, handle| {
            let request = request.clone();
            async move { driver.execute_query(handle, &request).await }
        })
        .await
        .map(|_| ())
        .map_err(|e| DbError::BootstrapFailed(e.to_string()))
    }

    /// Spec §4.7.3: compute and (best-effort) act on the migration
    /// decision table; failures are logged and retried next cycle.
    async fn run_migration_cycle(&mut self) {
        let available = match self.migration_source.latest_available().await {
            Ok(v) => v,
            Err(e) => {
                warn!(designator = %self.designator, error = %e, "failed to read migration source");
                return;
            }
        };
        let (loaded, applied) =
            self.queue.with_state(|s| (s.latest_loaded, s.latest_applied));

        match determine_action(available, loaded, applied) {
            MigrationAction::None => {}
            MigrationAction::Load => match self.migration_source.load_steps(loaded, available).await {
                Ok(steps) => {
                    self.loaded_steps = steps;
                    self.queue.with_state_mut(|s| s.latest_loaded = available);
                    debug!(designator = %self.designator, available, "loaded new migration manifests");
                }
                Err(e) => {
                    warn!(designator = %self.designator, error = %e, "failed to load migration manifests");
                }
            },
            MigrationAction::Apply => {
                if let Err(e) = self.apply_loaded_migrations(loaded).await {
                    warn!(designator = %self.designator, error = %e, "migration apply failed, retrying next cycle");
                }
            }
        }
        self.queue.with_state_mut(|s| s.latest_available = available);
    }

    /// The `Apply` action (spec §4.7.3): run each loaded-but-unapplied
    /// step, ascending by version, each in its own transaction, advancing
    /// `latest_applied` only as far as the last step whose transaction
    /// actually committed. A step that fails leaves the watermark at the
    /// last successful version; the remaining steps are retried next cycle.
    async fn apply_loaded_migrations(&mut self, loaded: u64) -> Result<(), DbError> {
        let applied = self.queue.with_state(|s| s.latest_applied);
        let mut steps: Vec<MigrationStep> = self
            .loaded_steps
            .iter()
            .filter(|s| s.version > applied && s.version <= loaded)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.version);

        for step in &steps {
            self.apply_one_step(step).await?;
            self.queue.with_state_mut(|s| s.latest_applied = step.version);
            debug!(designator = %self.designator, version = step.version, "applied migration step");
        }
        Ok(())
    }

    async fn apply_one_step(&self, step: &MigrationStep) -> Result<(), DbError> {
        let sql = step.sql.clone();
        let outcome = self
            .with_raw_connection(|driver, handle| async move {
                let txn = driver
                    .begin_transaction(handle, IsolationLevel::ReadCommitted)
                    .await?;
                let request = QueryRequest::new(sql, Default::default());
                match driver.execute_query(handle, &request).await {
                    Ok(_) => driver.commit_transaction(handle, txn).await,
                    Err(e) => {
                        let _ = driver.rollback_transaction(handle, txn).await;
                        Err(e)
                    }
                }
            })
            .await;
        match outcome {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => Err(DbError::MigrationStepFailed(e.to_string())),
            None => Err(DbError::MigrationStepFailed(
                "no persistent connection".to_string(),
            )),
        }
    }

    /// Spec §4.7.4 dispatch plus the heartbeat phase, bounded by the
    /// configured heartbeat interval so migrations are re-checked
    /// regularly even with no lead-bound traffic.
    async fn serve_one_cycle(&mut self) {
        let heartbeat = Duration::from_millis(self.config.heartbeat_interval_ms.max(1));
        let mut drained = 0usize;

        tokio::select! {
            _ = tokio::time::sleep(heartbeat) => {
                // `PendingResultRegistry` is keyed by `database_name` (that's
                // what `DatabaseQueueManager::submit_query` registers under),
                // not `self.designator` (`"<db>:lead:0"`) — a different
                // namespace.
                let evicted = self.pending.cleanup_expired(&self.database_name);
                if evicted > 0 {
                    debug!(designator = %self.designator, evicted, "heartbeat evicted expired pending results");
                }
            }
            _ = self.cancellation.cancelled() => {}
            _ = async {
                while drained < self.config.dispatch_batch {
                    match self.dispatch_rx.recv().await {
                        Some(DispatchRequest { request, respond_to }) => {
                            let outcome = self
                                .with_connection(|driver, handle| {
                                    let request = request.clone();
                                    async move { driver.execute_query(handle, &request).await }
                                })
                                .await
                                .map_err(DbError::from);
                            let _ = respond_to.send(outcome);
                            drained += 1;
                        }
                        None => break,
                    }
                }
            } => {}
        }
    }

    /// `DatabaseQueue`'s state lock is synchronous, so holding it across an
    /// await point is not an option; the actor (the sole owner of this
    /// queue's mutable state) takes the connection out, runs the
    /// operation, then puts it back. Returns `None` if there was no
    /// connection to take.
    async fn with_raw_connection<F, Fut, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&AnyDriver, &AnyHandle) -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let conn = self.queue.with_state_mut(|s| s.persistent_connection.take())?;
        let outcome = f(&self.driver, &conn.conn).await;
        self.queue
            .with_state_mut(|s| s.persistent_connection = Some(conn));
        Some(outcome)
    }

    async fn with_connection<F, Fut>(&self, f: F) -> Result<QueryResult, crate::error::DriverError>
    where
        F: FnOnce(&AnyDriver, &AnyHandle) -> Fut,
        Fut: std::future::Future<Output = Result<QueryResult, crate::error::DriverError>>,
    {
        match self.with_raw_connection(f).await {
            Some(outcome) => outcome,
            None => Err(crate::error::DriverError::ExecuteFailed(
                "no persistent connection".to_string(),
            )),
        }
    }

    async fn drain(mut self) {
        *self.state.lock() = LeadQueueState::Draining;
        info!(designator = %self.designator, "lead queue draining");
        for (_, (_, token)) in self.child_handles.drain() {
            token.cancel();
        }
        let conn = self.queue.with_state_mut(|s| s.persistent_connection.take());
        if let Some(conn) = conn {
            let _ = self.driver.disconnect(conn.conn).await;
        }
        self.queue.with_state_mut(|s| s.is_connected = false);
        *self.state.lock() = LeadQueueState::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::{DatabaseEngine, FakeClock};
    use crate::migration_source::{InMemoryMigrationSource, StaticMigrationSource};

    fn test_config(name: &str) -> DatabaseConfig {
        DatabaseConfig {
            database_name: name.to_string(),
            engine: DatabaseEngine::Sqlite,
            dsn: "sqlite::memory:".to_string(),
            slow_workers: 0,
            medium_workers: 0,
            fast_workers: 0,
            cache_workers: 0,
            heartbeat_interval_ms: 20,
            dispatch_batch: 16,
            pending_result_ttl_ms: 30_000,
            prepared_cache_capacity: 100,
        }
    }

    #[tokio::test]
    async fn wait_for_signal_times_out_when_never_sent() {
        let (_tx, rx) = watch::channel(false);
        let err = wait_for_signal(rx, Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, DbError::InitialConnectionTimeout));
    }

    #[tokio::test]
    async fn wait_for_signal_returns_immediately_if_already_true() {
        let (tx, rx) = watch::channel(false);
        let _ = tx.send(true);
        wait_for_signal(rx, Duration::from_millis(1)).await.unwrap();
    }

    #[tokio::test]
    async fn wait_for_signal_resolves_after_later_send() {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let _ = tx.send(true);
        });
        wait_for_signal(rx, Duration::from_millis(500)).await.unwrap();
    }

    #[tokio::test]
    async fn await_initial_connection_resolves_once_connected() {
        let pending = Arc::new(PendingResultRegistry::new(FakeClock::new()));
        let (handle, join) = LeadQueueActor::spawn(
            test_config("printerdb"),
            AnyDriver::for_engine(DatabaseEngine::Sqlite),
            Arc::new(StaticMigrationSource(0)),
            FakeClock::new(),
            pending,
        );

        handle
            .await_initial_connection(Duration::from_secs(5))
            .await
            .expect("initial connection should complete against an in-memory sqlite DSN");

        handle.request_shutdown();
        let _ = join.await;
    }

    #[tokio::test]
    async fn heartbeat_evicts_expired_pending_result_under_database_name_designator() {
        let pending = Arc::new(PendingResultRegistry::new(FakeClock::new()));
        let mut config = test_config("printerdb");
        config.heartbeat_interval_ms = 20;
        let (handle, join) = LeadQueueActor::spawn(
            config,
            AnyDriver::for_engine(DatabaseEngine::Sqlite),
            Arc::new(StaticMigrationSource(0)),
            FakeClock::new(),
            pending.clone(),
        );

        // `DatabaseQueueManager::submit_query` registers under
        // `database_name`; the heartbeat's `cleanup_expired` call must use
        // the same key or this slot is never swept.
        let (_query_id, rx) = pending.register("printerdb", 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(rx.await.unwrap(), hydrogen_wire::QueryOutcome::ResultTimeout);

        handle.request_shutdown();
        let _ = join.await;
    }

    #[tokio::test]
    async fn apply_action_executes_loaded_migration_steps_in_a_transaction() {
        let pending = Arc::new(PendingResultRegistry::new(FakeClock::new()));
        let mut config = test_config("printerdb");
        config.heartbeat_interval_ms = 10;
        let source: Arc<dyn MigrationSource> = Arc::new(InMemoryMigrationSource(vec![MigrationStep {
            version: 1,
            sql: "CREATE TABLE applied_marker (id INTEGER)".to_string(),
        }]));
        let (handle, join) =
            LeadQueueActor::spawn(config, AnyDriver::for_engine(DatabaseEngine::Sqlite), source, FakeClock::new(), pending);

        handle
            .await_initial_connection(Duration::from_secs(5))
            .await
            .unwrap();

        // Give the actor a few migrate/serve cycles to run `Load` then `Apply`.
        tokio::time::sleep(Duration::from_millis(300)).await;

        let result = handle
            .dispatch_to_lead(QueryRequest::new(
                "SELECT COUNT(*) FROM applied_marker",
                Default::default(),
            ))
            .await
            .expect("the migration step should have created applied_marker");
        assert_eq!(result.row_count, 1);

        handle.request_shutdown();
        let _ = join.await;
    }
}
