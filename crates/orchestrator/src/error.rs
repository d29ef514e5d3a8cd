// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("unknown subsystem: {0}")]
    UnknownSubsystem(String),
}
