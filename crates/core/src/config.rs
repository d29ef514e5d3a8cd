// SPDX-License-Identifier: MIT

//! Daemon configuration (spec §6.3, §9 AppContext).
//!
//! Parsed once at process start from TOML plus CLI overrides, validated
//! before any subsystem's `check_ready` is invoked, then shared read-only
//! through `AppContext` for the rest of the process lifetime.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::HydrogenError;

/// Buffer-size defaults observed by the core (spec §6.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSizes {
    pub line_buffer: usize,
    pub log_buffer: usize,
    pub post_processor_buffer: usize,
    pub command_buffer: usize,
    pub response_buffer: usize,
}

impl Default for BufferSizes {
    fn default() -> Self {
        Self {
            line_buffer: 4 * 1024,
            log_buffer: 8 * 1024,
            post_processor_buffer: 8 * 1024,
            command_buffer: 4 * 1024,
            response_buffer: 16 * 1024,
        }
    }
}

/// One configured logical database and its lead/child queue sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub database_name: String,
    pub engine: DatabaseEngine,
    pub dsn: String,
    #[serde(default = "default_worker_counts")]
    pub slow_workers: u32,
    #[serde(default = "default_worker_counts")]
    pub medium_workers: u32,
    #[serde(default = "default_worker_counts")]
    pub fast_workers: u32,
    #[serde(default = "default_worker_counts")]
    pub cache_workers: u32,
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    #[serde(default = "default_dispatch_batch")]
    pub dispatch_batch: usize,
    #[serde(default = "default_pending_result_ttl_ms")]
    pub pending_result_ttl_ms: u64,
    #[serde(default = "default_prepared_cache_capacity")]
    pub prepared_cache_capacity: usize,
}

fn default_worker_counts() -> u32 {
    1
}
fn default_heartbeat_interval_ms() -> u64 {
    5_000
}
fn default_dispatch_batch() -> usize {
    16
}
fn default_pending_result_ttl_ms() -> u64 {
    30_000
}
fn default_prepared_cache_capacity() -> usize {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseEngine {
    Postgres,
    MySql,
    Sqlite,
    Db2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub state_dir: PathBuf,
    pub buffers: BufferSizes,
    /// Layer limit bound per spec §6.3: clamped into `[1, 10000]`.
    pub layer_limit: u32,
    pub databases: Vec<DatabaseConfig>,
    /// `tracing_subscriber::EnvFilter` directive the `Logging` subsystem
    /// installs. `None` falls back to `RUST_LOG`, then `"info"`.
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("/var/lib/hydrogen"),
            buffers: BufferSizes::default(),
            layer_limit: 1000,
            databases: Vec::new(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn load_from_str(toml_str: &str) -> Result<Self, HydrogenError> {
        let mut config: Config =
            toml::from_str(toml_str).map_err(|e| HydrogenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and clamp configuration. Rejects `pending_result_ttl == 0`
    /// per the Open Question resolution in spec §9.
    pub fn validate(&mut self) -> Result<(), HydrogenError> {
        self.layer_limit = self.layer_limit.clamp(1, 10_000);
        for db in &self.databases {
            if db.pending_result_ttl_ms == 0 {
                return Err(HydrogenError::Config(format!(
                    "database '{}': pending_result_ttl_ms must not be 0",
                    db.database_name
                )));
            }
            if db.database_name.is_empty() {
                return Err(HydrogenError::Config(
                    "database_name must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffer_sizes_match_spec() {
        let b = BufferSizes::default();
        assert_eq!(b.line_buffer, 4096);
        assert_eq!(b.log_buffer, 8192);
        assert_eq!(b.post_processor_buffer, 8192);
        assert_eq!(b.command_buffer, 4096);
        assert_eq!(b.response_buffer, 16384);
    }

    #[test]
    fn layer_limit_clamped_into_bounds() {
        let mut config = Config {
            layer_limit: 999_999,
            ..Config::default()
        };
        config.validate().unwrap();
        assert_eq!(config.layer_limit, 10_000);

        let mut config2 = Config {
            layer_limit: 0,
            ..Config::default()
        };
        config2.validate().unwrap();
        assert_eq!(config2.layer_limit, 1);
    }

    #[test]
    fn zero_ttl_rejected_at_load() {
        let toml_str = r#"
            [[databases]]
            database_name = "printerdb"
            engine = "postgres"
            dsn = "postgres://localhost/printerdb"
            pending_result_ttl_ms = 0
        "#;
        let err = Config::load_from_str(toml_str).unwrap_err();
        assert!(matches!(err, HydrogenError::Config(_)));
    }

    #[test]
    fn valid_config_loads() {
        let toml_str = r#"
            [[databases]]
            database_name = "printerdb"
            engine = "postgres"
            dsn = "postgres://localhost/printerdb"
        "#;
        let config = Config::load_from_str(toml_str).unwrap();
        assert_eq!(config.databases.len(), 1);
        assert_eq!(config.databases[0].pending_result_ttl_ms, 30_000);
    }
}
