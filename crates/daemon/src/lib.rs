// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! hydrogen-daemon: wires the Subsystem Registry (C1), Readiness
//! Evaluator (C2), Launch/Landing Planner+Executor (C3-C5), and every
//! reference `SubsystemPlugin` together, then drives the process through
//! startup, steady state, and shutdown.

pub mod cli;
pub mod error;
pub mod run;
pub mod wiring;

pub use error::DaemonError;
