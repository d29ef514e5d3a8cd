// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! hydrogen-readiness: C2 Readiness Evaluator and the subsystem plug-in
//! contract (spec §4.2, §6.1).

mod evaluator;
mod plugin;
mod verdict;

pub use evaluator::ReadinessEvaluator;
pub use plugin::SubsystemPlugin;
pub use verdict::{ReadinessBatch, ReadinessVerdict};
