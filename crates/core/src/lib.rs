// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! hydrogen-core: shared identifiers, error taxonomy, and clock abstraction
//! used by every other Hydrogen crate.

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod state;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BufferSizes, Config, DatabaseConfig, DatabaseEngine};
pub use context::AppContext;
pub use error::{HydrogenError, Severity};
pub use ids::{generate_designator, generate_query_id};
pub use state::SubsystemState;
