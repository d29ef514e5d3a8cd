// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WireError {
    #[error("unknown parameter type bucket: {0}")]
    UnknownParameterType(String),

    #[error("parameter '{0}' referenced in SQL template but not supplied")]
    ParameterNotFound(String),
}
