// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Driver-layer failures (spec §7 taxonomy, transient + fatal subsets
/// relevant to one backend connection).
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("health check failed")]
    HealthCheckFailed,
    #[error("prepare failed: {0}")]
    PrepareFailed(String),
    #[error("execute failed: {0}")]
    ExecuteFailed(String),
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
    #[error("handle failed the corrupted-mutex sentinel check")]
    CorruptedHandle,
}

/// Database-queue-layer failures (spec §7), surfaced to `hydrogen-daemon`
/// callers.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unknown database: {0}")]
    UnknownDatabase(String),
    #[error("no child queue configured for priority {0:?}")]
    NoChildQueueForPriority(crate::priority::QueuePriority),
    #[error("request rejected: dispatch channel at capacity")]
    BackpressureRejected,
    #[error("result not delivered within the requested timeout")]
    ResultTimeout,
    #[error("unknown query id: {0}")]
    UnknownQueryId(String),
    #[error("shutdown_child_queue called on a non-lead queue")]
    NotLeadQueue,
    #[error("shutdown_child_queue called with no queue type")]
    NullQueueType,
    #[error("shutdown_child_queue called with no matching queue")]
    NullQueue,
    #[error("bootstrap failed: {0}")]
    BootstrapFailed(String),
    #[error("migration step failed: {0}")]
    MigrationStepFailed(String),
    #[error("initial connection did not complete before the requested timeout")]
    InitialConnectionTimeout,
    #[error(transparent)]
    Driver(#[from] DriverError),
}
