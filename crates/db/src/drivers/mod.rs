// SPDX-License-Identifier: MIT

//! Per-engine `Driver` implementations (spec §6.2), one module per
//! backend selected by `DatabaseEngine` at config load time in place of
//! the source's `dlsym`-based plugin loading (spec §9 Design Notes).

pub mod convert;
pub mod db2;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use db2::Db2Driver;
pub use mysql::MySqlDriver;
pub use postgres::PostgresDriver;
pub use sqlite::SqliteDriver;
