// SPDX-License-Identifier: MIT

//! Shared error taxonomy (spec §7): caller errors, transient failures,
//! resource failures, timing failures, and fatal errors. Individual crates
//! define their own `thiserror` enums for the errors they can actually
//! produce; this module holds the cross-cutting severity classification
//! used to decide retry/propagation policy in the orchestrator and the
//! lead queue.

use thiserror::Error;

/// How a failure should be handled by its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Reported synchronously, no retry (e.g. `UnknownSubsystem`).
    Caller,
    /// Retried by the lead queue on its next cycle.
    Transient,
    /// Not retried by the core; surfaced to the caller.
    Resource,
    /// Surfaced to caller; underlying work may still complete.
    Timing,
    /// The affected subsystem transitions to `Error`; process restart required.
    Fatal,
}

/// Top-level error type for the `hydrogen-daemon` binary. Wraps each
/// crate's error so `main` can return a single `Result` while still
/// reflecting the real failure in logs.
#[derive(Debug, Error)]
pub enum HydrogenError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("orchestrator error: {0}")]
    Orchestrator(String),

    #[error("database error: {0}")]
    Db(String),
}
