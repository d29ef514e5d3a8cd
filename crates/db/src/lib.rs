// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! hydrogen-db: the Database Queue Manager (C6), Lead Queue Actor (C7),
//! Pending Result Registry (C8), prepared-statement cache, migration
//! engine, corrupted-handle defense, and per-engine drivers (spec §4.6-§4.8).

pub mod connection;
pub mod driver;
pub mod drivers;
pub mod engine_driver;
pub mod error;
pub mod lead_queue;
pub mod manager;
pub mod migration;
pub mod migration_source;
pub mod pending;
pub mod prepared_cache;
pub mod priority;
pub mod queue;

pub use connection::{handle_connection_success, is_plausible_address, ConnectionHandle};
pub use driver::{Driver, IsolationLevel, TransactionHandle};
pub use engine_driver::{AnyDriver, AnyHandle};
pub use error::{DbError, DriverError};
pub use lead_queue::{LeadQueueActor, LeadQueueHandle, LeadQueueState};
pub use manager::DatabaseQueueManager;
pub use migration::{determine_action, MigrationAction};
pub use migration_source::{MigrationSource, MigrationStep, StaticMigrationSource};
pub use pending::PendingResultRegistry;
pub use prepared_cache::{PreparedHandle, PreparedStatementCache, DEFAULT_PREPARED_CACHE_CAPACITY};
pub use priority::{QueueKind, QueuePriority};
pub use queue::{DatabaseQueue, QueueState};
