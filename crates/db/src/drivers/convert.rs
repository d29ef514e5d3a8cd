// SPDX-License-Identifier: MIT

//! Shared dynamic row -> JSON conversion for the `sqlx`-backed drivers,
//! grounded in the fallback-try_get chain the example pack's ETL engine
//! uses for the same problem (unknown column types at the SQL layer).

use serde_json::Value;
use sqlx::{Column, Row};

pub fn row_to_json<'r, R>(row: &'r R) -> (Vec<String>, Vec<Value>)
where
    R: Row,
    i64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    f64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    bool: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    let mut names = Vec::with_capacity(row.columns().len());
    let mut values = Vec::with_capacity(row.columns().len());
    for (i, column) in row.columns().iter().enumerate() {
        names.push(column.name().to_string());
        let value = row
            .try_get::<i64, _>(i)
            .map(Value::from)
            .or_else(|_| row.try_get::<f64, _>(i).map(Value::from))
            .or_else(|_| row.try_get::<bool, _>(i).map(Value::from))
            .or_else(|_| row.try_get::<String, _>(i).map(Value::from))
            .unwrap_or(Value::Null);
        values.push(value);
    }
    (names, values)
}

/// True when `sql`'s first keyword is a statement that mutates rows
/// rather than returning them (spec §6.2: `affected_rows` is only
/// populated for `INSERT`/`UPDATE`/`DELETE`).
pub fn is_mutating_statement(sql: &str) -> bool {
    let first_word = sql.trim_start().split_whitespace().next().unwrap_or("");
    matches!(
        first_word.to_ascii_uppercase().as_str(),
        "INSERT" | "UPDATE" | "DELETE" | "REPLACE"
    )
}
