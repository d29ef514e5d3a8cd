// SPDX-License-Identifier: MIT

//! The per-engine database driver contract (spec §6.2), re-expressed as
//! a trait in place of the source's weak-symbol/`dlsym` dispatch (spec
//! §9 Design Notes).

use hydrogen_core::DatabaseConfig;
use hydrogen_wire::{QueryRequest, QueryResult};

use crate::error::DriverError;
use crate::prepared_cache::PreparedHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle(pub String);

/// One concrete implementation per engine (Postgres/MySQL/SQLite/DB2);
/// runtime engine selection is a config-time enum rather than a symbol
/// swap.
#[async_trait::async_trait]
pub trait Driver: Send + Sync {
    type Handle: Send;

    async fn connect(
        &self,
        config: &DatabaseConfig,
        designator: &str,
    ) -> Result<Self::Handle, DriverError>;

    async fn disconnect(&self, handle: Self::Handle) -> Result<(), DriverError>;

    async fn health_check(&self, handle: &Self::Handle) -> bool;

    async fn reset_connection(&self, handle: &mut Self::Handle) -> Result<(), DriverError>;

    async fn execute_query(
        &self,
        handle: &Self::Handle,
        request: &QueryRequest,
    ) -> Result<QueryResult, DriverError>;

    async fn prepare_statement(
        &self,
        handle: &Self::Handle,
        name: &str,
        sql: &str,
        add_to_cache: bool,
    ) -> Result<PreparedHandle, DriverError>;

    async fn execute_prepared(
        &self,
        handle: &Self::Handle,
        stmt: &PreparedHandle,
        request: &QueryRequest,
    ) -> Result<QueryResult, DriverError>;

    async fn begin_transaction(
        &self,
        handle: &Self::Handle,
        isolation: IsolationLevel,
    ) -> Result<TransactionHandle, DriverError>;

    async fn commit_transaction(
        &self,
        handle: &Self::Handle,
        txn: TransactionHandle,
    ) -> Result<(), DriverError>;

    async fn rollback_transaction(
        &self,
        handle: &Self::Handle,
        txn: TransactionHandle,
    ) -> Result<(), DriverError>;
}
