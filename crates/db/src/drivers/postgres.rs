// SPDX-License-Identifier: MIT

use hydrogen_core::{DatabaseConfig, DatabaseEngine};
use hydrogen_wire::{convert_named_to_positional, ParamValue, QueryRequest, QueryResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::driver::{Driver, IsolationLevel, TransactionHandle};
use crate::drivers::convert::{is_mutating_statement, row_to_json};
use crate::error::DriverError;
use crate::prepared_cache::PreparedHandle;

/// `sqlx::PgPool`-backed driver. Prepared statements are modeled as a
/// name -> canonicalized-SQL mapping; `sqlx` itself caches the server-side
/// prepare per pooled connection, so a second `execute_prepared` call for
/// the same name reuses the backend's statement cache transparently.
#[derive(Default)]
pub struct PostgresDriver;

pub struct PostgresHandle {
    pool: PgPool,
}

fn isolation_sql(level: IsolationLevel) -> &'static str {
    match level {
        IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
        IsolationLevel::ReadCommitted => "READ COMMITTED",
        IsolationLevel::RepeatableRead => "REPEATABLE READ",
        IsolationLevel::Serializable => "SERIALIZABLE",
    }
}

fn bind_params<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    params: &'q [ParamValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for param in params {
        query = match param {
            ParamValue::Integer(v) => query.bind(*v),
            ParamValue::Text(v) => query.bind(v.clone()),
            ParamValue::Boolean(v) => query.bind(*v),
            ParamValue::Float(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait::async_trait]
impl Driver for PostgresDriver {
    type Handle = PostgresHandle;

    async fn connect(
        &self,
        config: &DatabaseConfig,
        designator: &str,
    ) -> Result<Self::Handle, DriverError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&config.dsn)
            .await
            .map_err(|e| DriverError::ConnectFailed(format!("{designator}: {e}")))?;
        Ok(PostgresHandle { pool })
    }

    async fn disconnect(&self, handle: Self::Handle) -> Result<(), DriverError> {
        handle.pool.close().await;
        Ok(())
    }

    async fn health_check(&self, handle: &Self::Handle) -> bool {
        sqlx::query("SELECT 1").execute(&handle.pool).await.is_ok()
    }

    async fn reset_connection(&self, handle: &mut Self::Handle) -> Result<(), DriverError> {
        let _ = self.health_check(handle).await;
        Ok(())
    }

    async fn execute_query(
        &self,
        handle: &Self::Handle,
        request: &QueryRequest,
    ) -> Result<QueryResult, DriverError> {
        let (sql, params) = convert_named_to_positional(
            &request.sql_template,
            &request.params,
            DatabaseEngine::Postgres,
        )
        .map_err(|e| DriverError::ExecuteFailed(e.to_string()))?;

        if is_mutating_statement(&sql) {
            let query = bind_params(sqlx::query(&sql), &params);
            let result = query
                .execute(&handle.pool)
                .await
                .map_err(|e| DriverError::ExecuteFailed(e.to_string()))?;
            return Ok(hydrogen_wire::mutation_query_result(result.rows_affected()));
        }

        let query = bind_params(sqlx::query(&sql), &params);
        let rows = query
            .fetch_all(&handle.pool)
            .await
            .map_err(|e| DriverError::ExecuteFailed(e.to_string()))?;

        if rows.is_empty() {
            return Ok(hydrogen_wire::build_query_result(vec![], vec![], 0));
        }
        let column_names = rows[0]
            .columns()
            .iter()
            .map(|c| sqlx::Column::name(c).to_string())
            .collect();
        let row_values = rows
            .iter()
            .map(|row| row_to_json(row).1)
            .collect();
        Ok(hydrogen_wire::build_query_result(
            column_names,
            row_values,
            0,
        ))
    }

    async fn prepare_statement(
        &self,
        _handle: &Self::Handle,
        name: &str,
        sql: &str,
        _add_to_cache: bool,
    ) -> Result<PreparedHandle, DriverError> {
        Ok(PreparedHandle(format!("{name}::{sql}")))
    }

    async fn execute_prepared(
        &self,
        handle: &Self::Handle,
        stmt: &PreparedHandle,
        request: &QueryRequest,
    ) -> Result<QueryResult, DriverError> {
        let sql = stmt
            .0
            .split_once("::")
            .map(|(_, sql)| sql.to_string())
            .unwrap_or_else(|| stmt.0.clone());
        let rebuilt = QueryRequest::new(sql, request.params.clone());
        self.execute_query(handle, &rebuilt).await
    }

    async fn begin_transaction(
        &self,
        handle: &Self::Handle,
        isolation: IsolationLevel,
    ) -> Result<TransactionHandle, DriverError> {
        sqlx::query(&format!(
            "BEGIN TRANSACTION ISOLATION LEVEL {}",
            isolation_sql(isolation)
        ))
        .execute(&handle.pool)
        .await
        .map_err(|e| DriverError::TransactionFailed(e.to_string()))?;
        Ok(TransactionHandle(format!("{:?}", isolation)))
    }

    async fn commit_transaction(
        &self,
        handle: &Self::Handle,
        _txn: TransactionHandle,
    ) -> Result<(), DriverError> {
        sqlx::query("COMMIT")
            .execute(&handle.pool)
            .await
            .map_err(|e| DriverError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    async fn rollback_transaction(
        &self,
        handle: &Self::Handle,
        _txn: TransactionHandle,
    ) -> Result<(), DriverError> {
        sqlx::query("ROLLBACK")
            .execute(&handle.pool)
            .await
            .map_err(|e| DriverError::TransactionFailed(e.to_string()))?;
        Ok(())
    }
}
