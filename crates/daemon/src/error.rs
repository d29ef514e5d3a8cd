// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Top-level error for the `hydrogend` binary. Wraps each crate's own
/// error type so `main` can return a single `Result` while logs still
/// carry the real failure (spec §7 propagation policy).
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Core(#[from] hydrogen_core::HydrogenError),

    #[error(transparent)]
    Registry(#[from] hydrogen_registry::RegistryError),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
