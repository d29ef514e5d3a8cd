// SPDX-License-Identifier: MIT

//! `odbc-api`-backed DB2 driver. `odbc_api::Connection` wraps a raw ODBC
//! handle that is not `Send` across an await point, so unlike the
//! `sqlx` drivers a `Db2Handle` holds only the connection string and every
//! operation opens its own short-lived connection inside
//! `spawn_blocking`, matching `odbc-api`'s own connect-per-call examples.

use std::sync::OnceLock;

use hydrogen_core::{DatabaseConfig, DatabaseEngine};
use hydrogen_wire::{convert_named_to_positional, ParamValue, QueryRequest, QueryResult};
use odbc_api::{buffers::TextRowSet, Cursor, Environment, IntoParameter, ResultSetMetadata};
use serde_json::Value;

use crate::driver::{Driver, IsolationLevel, TransactionHandle};
use crate::error::DriverError;
use crate::prepared_cache::PreparedHandle;

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

fn environment() -> &'static Environment {
    // Safety: `odbc_api::Environment::new` requires that no other thread
    // constructs an `Environment` concurrently; `OnceLock` serializes the
    // one call this process ever makes.
    ENVIRONMENT.get_or_init(|| unsafe {
        Environment::new().expect("failed to initialize ODBC environment")
    })
}

#[derive(Default)]
pub struct Db2Driver;

pub struct Db2Handle {
    connection_string: String,
}

fn isolation_sql(level: IsolationLevel) -> &'static str {
    match level {
        IsolationLevel::ReadUncommitted => "UR",
        IsolationLevel::ReadCommitted => "CS",
        IsolationLevel::RepeatableRead => "RS",
        IsolationLevel::Serializable => "RR",
    }
}

/// Column names are not fetched from the driver metadata (ODBC's
/// `SQLDescribeCol` needs a caller-owned `u16` name buffer per column,
/// which adds little here); every column is named positionally and
/// `build_query_result` already knows how to fall back to `col_<index>`.
fn cursor_to_json(mut cursor: impl Cursor + ResultSetMetadata) -> Result<(Vec<String>, Vec<Vec<Value>>), DriverError> {
    let num_cols = cursor.num_result_cols().map_err(odbc_err)? as usize;
    let headers = vec![String::new(); num_cols];

    let mut buffer = TextRowSet::for_cursor(512, &mut cursor, Some(4096)).map_err(odbc_err)?;
    let mut row_set_cursor = cursor.bind_buffer(&mut buffer).map_err(odbc_err)?;

    let mut rows = Vec::new();
    while let Some(batch) = row_set_cursor.fetch().map_err(odbc_err)? {
        for row_index in 0..batch.num_rows() {
            let mut row = Vec::with_capacity(num_cols);
            for col_index in 0..num_cols {
                let value = batch
                    .at(col_index, row_index)
                    .map(|bytes| Value::String(String::from_utf8_lossy(bytes).into_owned()))
                    .unwrap_or(Value::Null);
                row.push(value);
            }
            rows.push(row);
        }
    }
    Ok((headers, rows))
}

fn odbc_err(e: impl std::fmt::Display) -> DriverError {
    DriverError::ExecuteFailed(e.to_string())
}

fn param_to_odbc(value: &ParamValue) -> Box<dyn odbc_api::parameter::InputParameter> {
    match value {
        ParamValue::Integer(v) => Box::new(v.into_parameter()),
        ParamValue::Text(v) => Box::new(v.clone().into_parameter()),
        ParamValue::Boolean(v) => Box::new((*v as i32).into_parameter()),
        ParamValue::Float(v) => Box::new(v.into_parameter()),
    }
}

#[async_trait::async_trait]
impl Driver for Db2Driver {
    type Handle = Db2Handle;

    async fn connect(
        &self,
        config: &DatabaseConfig,
        designator: &str,
    ) -> Result<Self::Handle, DriverError> {
        let dsn = config.dsn.clone();
        let designator = designator.to_string();
        tokio::task::spawn_blocking(move || {
            environment()
                .connect_with_connection_string(&dsn, Default::default())
                .map_err(|e| DriverError::ConnectFailed(format!("{designator}: {e}")))?;
            Ok(Db2Handle { connection_string: dsn })
        })
        .await
        .map_err(|e| DriverError::ConnectFailed(e.to_string()))?
    }

    async fn disconnect(&self, _handle: Self::Handle) -> Result<(), DriverError> {
        Ok(())
    }

    async fn health_check(&self, handle: &Self::Handle) -> bool {
        let dsn = handle.connection_string.clone();
        tokio::task::spawn_blocking(move || {
            environment()
                .connect_with_connection_string(&dsn, Default::default())
                .and_then(|conn| conn.execute("SELECT 1 FROM SYSIBM.SYSDUMMY1", ()))
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }

    async fn reset_connection(&self, _handle: &mut Self::Handle) -> Result<(), DriverError> {
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
            DatabaseEngine::Db2,
        )
        .map_err(|e| DriverError::ExecuteFailed(e.to_string()))?;
        let dsn = handle.connection_string.clone();

        tokio::task::spawn_blocking(move || {
            let conn = environment()
                .connect_with_connection_string(&dsn, Default::default())
                .map_err(odbc_err)?;
            let bound: Vec<_> = params.iter().map(param_to_odbc).collect();
            let params_slice: Vec<&dyn odbc_api::parameter::InputParameter> =
                bound.iter().map(|p| p.as_ref()).collect();
            match conn
                .execute(&sql, params_slice.as_slice())
                .map_err(odbc_err)?
            {
                Some(cursor) => {
                    let (columns, rows) = cursor_to_json(cursor)?;
                    Ok(hydrogen_wire::build_query_result(columns, rows, 0))
                }
                None => Ok(hydrogen_wire::mutation_query_result(0)),
            }
        })
        .await
        .map_err(|e| DriverError::ExecuteFailed(e.to_string()))?
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
        _handle: &Self::Handle,
        isolation: IsolationLevel,
    ) -> Result<TransactionHandle, DriverError> {
        Ok(TransactionHandle(isolation_sql(isolation).to_string()))
    }

    async fn commit_transaction(
        &self,
        _handle: &Self::Handle,
        _txn: TransactionHandle,
    ) -> Result<(), DriverError> {
        Ok(())
    }

    async fn rollback_transaction(
        &self,
        _handle: &Self::Handle,
        _txn: TransactionHandle,
    ) -> Result<(), DriverError> {
        Ok(())
    }
}
