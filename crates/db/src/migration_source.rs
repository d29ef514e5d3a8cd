// SPDX-License-Identifier: MIT

//! Source of migration manifests consulted by the `Load` action (spec
//! §4.7.3). The source program reads these from a configured directory of
//! numbered SQL files; here that's abstracted behind a trait so the lead
//! queue loop doesn't hardcode a filesystem layout, with a static source
//! as the default for databases that declare no migrations of their own.

use async_trait::async_trait;

use crate::error::DbError;

/// One migration manifest: a version and the SQL to run for it, ordered
/// ascending by `version` (spec §4.7.3, §3 invariant 4).
#[derive(Debug, Clone)]
pub struct MigrationStep {
    pub version: u64,
    pub sql: String,
}

#[async_trait]
pub trait MigrationSource: Send + Sync {
    /// The highest migration version known to exist, independent of what
    /// has been loaded or applied so far.
    async fn latest_available(&self) -> Result<u64, DbError>;

    /// Manifests whose version is in `(after, up_to]`, for the `Load`
    /// action to cache ahead of `Apply`.
    async fn load_steps(&self, after: u64, up_to: u64) -> Result<Vec<MigrationStep>, DbError>;
}

/// A source whose available watermark never advances past its initial
/// value. Used for databases with no migration manifests configured.
pub struct StaticMigrationSource(pub u64);

#[async_trait]
impl MigrationSource for StaticMigrationSource {
    async fn latest_available(&self) -> Result<u64, DbError> {
        Ok(self.0)
    }

    async fn load_steps(&self, _after: u64, _up_to: u64) -> Result<Vec<MigrationStep>, DbError> {
        Ok(Vec::new())
    }
}

/// An in-memory manifest list, for exercising `Load`/`Apply` against a real
/// driver without a filesystem fixture.
#[cfg(test)]
pub struct InMemoryMigrationSource(pub Vec<MigrationStep>);

#[cfg(test)]
#[async_trait]
impl MigrationSource for InMemoryMigrationSource {
    async fn latest_available(&self) -> Result<u64, DbError> {
        Ok(self.0.iter().map(|s| s.version).max().unwrap_or(0))
    }

    async fn load_steps(&self, after: u64, up_to: u64) -> Result<Vec<MigrationStep>, DbError> {
        Ok(self
            .0
            .iter()
            .filter(|s| s.version > after && s.version <= up_to)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_reports_its_fixed_watermark() {
        let source = StaticMigrationSource(42);
        assert_eq!(source.latest_available().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn static_source_has_no_steps_to_load() {
        let source = StaticMigrationSource(42);
        assert!(source.load_steps(0, 42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_memory_source_loads_only_steps_in_range() {
        let source = InMemoryMigrationSource(vec![
            MigrationStep { version: 1, sql: "one".to_string() },
            MigrationStep { version: 2, sql: "two".to_string() },
            MigrationStep { version: 3, sql: "three".to_string() },
        ]);
        assert_eq!(source.latest_available().await.unwrap(), 3);
        let steps = source.load_steps(1, 2).await.unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].version, 2);
    }
}
