// SPDX-License-Identifier: MIT

//! Runtime engine selection. `Driver::Handle` is an associated type, so a
//! `dyn Driver` cannot erase it; `AnyDriver`/`AnyHandle` do the same job
//! with a closed sum type picked once from `DatabaseConfig::engine` at
//! connect time.

use hydrogen_core::{DatabaseConfig, DatabaseEngine};
use hydrogen_wire::QueryRequest;
use hydrogen_wire::QueryResult;

use crate::driver::{Driver, IsolationLevel, TransactionHandle};
use crate::drivers::{Db2Driver, MySqlDriver, PostgresDriver, SqliteDriver};
use crate::drivers::db2::Db2Handle;
use crate::drivers::mysql::MySqlHandle;
use crate::drivers::postgres::PostgresHandle;
use crate::drivers::sqlite::SqliteHandle;
use crate::error::DriverError;
use crate::prepared_cache::PreparedHandle;

pub enum AnyHandle {
    Postgres(PostgresHandle),
    MySql(MySqlHandle),
    Sqlite(SqliteHandle),
    Db2(Db2Handle),
}

/// Picks the concrete `Driver` impl for a configured engine and forwards
/// every `Driver` operation to it. Holds no state of its own.
pub enum AnyDriver {
    Postgres(PostgresDriver),
    MySql(MySqlDriver),
    Sqlite(SqliteDriver),
    Db2(Db2Driver),
}

impl AnyDriver {
    pub fn for_engine(engine: DatabaseEngine) -> Self {
        match engine {
            DatabaseEngine::Postgres => Self::Postgres(PostgresDriver),
            DatabaseEngine::MySql => Self::MySql(MySqlDriver),
            DatabaseEngine::Sqlite => Self::Sqlite(SqliteDriver),
            DatabaseEngine::Db2 => Self::Db2(Db2Driver),
        }
    }

    pub async fn connect(
        &self,
        config: &DatabaseConfig,
        designator: &str,
    ) -> Result<AnyHandle, DriverError> {
        Ok(match self {
            Self::Postgres(d) => AnyHandle::Postgres(d.connect(config, designator).await?),
            Self::MySql(d) => AnyHandle::MySql(d.connect(config, designator).await?),
            Self::Sqlite(d) => AnyHandle::Sqlite(d.connect(config, designator).await?),
            Self::Db2(d) => AnyHandle::Db2(d.connect(config, designator).await?),
        })
    }

    pub async fn disconnect(&self, handle: AnyHandle) -> Result<(), DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.disconnect(h).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.disconnect(h).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.disconnect(h).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.disconnect(h).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn health_check(&self, handle: &AnyHandle) -> bool {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.health_check(h).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.health_check(h).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.health_check(h).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.health_check(h).await,
            _ => false,
        }
    }

    pub async fn reset_connection(&self, handle: &mut AnyHandle) -> Result<(), DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.reset_connection(h).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.reset_connection(h).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.reset_connection(h).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.reset_connection(h).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn execute_query(
        &self,
        handle: &AnyHandle,
        request: &QueryRequest,
    ) -> Result<QueryResult, DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.execute_query(h, request).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.execute_query(h, request).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.execute_query(h, request).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.execute_query(h, request).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn prepare_statement(
        &self,
        handle: &AnyHandle,
        name: &str,
        sql: &str,
        add_to_cache: bool,
    ) -> Result<PreparedHandle, DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => {
                d.prepare_statement(h, name, sql, add_to_cache).await
            }
            (Self::MySql(d), AnyHandle::MySql(h)) => {
                d.prepare_statement(h, name, sql, add_to_cache).await
            }
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => {
                d.prepare_statement(h, name, sql, add_to_cache).await
            }
            (Self::Db2(d), AnyHandle::Db2(h)) => {
                d.prepare_statement(h, name, sql, add_to_cache).await
            }
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn execute_prepared(
        &self,
        handle: &AnyHandle,
        stmt: &PreparedHandle,
        request: &QueryRequest,
    ) -> Result<QueryResult, DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => {
                d.execute_prepared(h, stmt, request).await
            }
            (Self::MySql(d), AnyHandle::MySql(h)) => d.execute_prepared(h, stmt, request).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.execute_prepared(h, stmt, request).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.execute_prepared(h, stmt, request).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn begin_transaction(
        &self,
        handle: &AnyHandle,
        isolation: IsolationLevel,
    ) -> Result<TransactionHandle, DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.begin_transaction(h, isolation).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.begin_transaction(h, isolation).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.begin_transaction(h, isolation).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.begin_transaction(h, isolation).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn commit_transaction(
        &self,
        handle: &AnyHandle,
        txn: TransactionHandle,
    ) -> Result<(), DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.commit_transaction(h, txn).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.commit_transaction(h, txn).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.commit_transaction(h, txn).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.commit_transaction(h, txn).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }

    pub async fn rollback_transaction(
        &self,
        handle: &AnyHandle,
        txn: TransactionHandle,
    ) -> Result<(), DriverError> {
        match (self, handle) {
            (Self::Postgres(d), AnyHandle::Postgres(h)) => d.rollback_transaction(h, txn).await,
            (Self::MySql(d), AnyHandle::MySql(h)) => d.rollback_transaction(h, txn).await,
            (Self::Sqlite(d), AnyHandle::Sqlite(h)) => d.rollback_transaction(h, txn).await,
            (Self::Db2(d), AnyHandle::Db2(h)) => d.rollback_transaction(h, txn).await,
            _ => Err(DriverError::ExecuteFailed(
                "engine/handle mismatch".to_string(),
            )),
        }
    }
}
