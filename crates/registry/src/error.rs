// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("subsystem '{0}' already registered with a different dependency set")]
    AlreadyRegisteredDifferentShape(String),

    #[error("adding this dependency edge would close a cycle")]
    CycleDetected,

    #[error("unknown subsystem: {0}")]
    UnknownSubsystem(String),

    #[error("illegal state transition from {from:?} to {to:?}")]
    IllegalTransition {
        from: hydrogen_core::SubsystemState,
        to: hydrogen_core::SubsystemState,
    },
}
