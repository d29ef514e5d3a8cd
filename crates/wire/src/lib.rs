// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! hydrogen-wire: parameter canonicalization, typed parameter parsing,
//! and query result JSON shaping (spec §6.2), shared by every database
//! driver in `hydrogen-db`.

mod canonical;
mod error;
mod params;
mod request;
mod result;

pub use canonical::convert_named_to_positional;
pub use error::WireError;
pub use hydrogen_core::DatabaseEngine;
pub use params::{parse_typed_parameters, ParamValue};
pub use request::QueryRequest;
pub use result::{build_query_result, mutation_query_result, QueryOutcome, QueryResult};
