// SPDX-License-Identifier: MIT

//! `Database` (spec §3, §4.6): owns the `DatabaseQueueManager` (C6) for
//! the process — one lead queue per configured database. Wire-level SQL
//! protocol bytes are a Non-goal (spec §1); this plug-in is the seam
//! where the orchestrator's launch/land pass meets the lead-queue pool.

use std::sync::Arc;

use hydrogen_core::{AppContext, SystemClock};
use hydrogen_db::DatabaseQueueManager;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared handle to the running manager, usable by `Payload` and other
/// dependents once `Database` has reached `Running`.
pub type ManagerHandle = Arc<DatabaseQueueManager<SystemClock>>;

#[derive(Default)]
pub struct DatabasePlugin {
    manager: Mutex<Option<ManagerHandle>>,
}

impl DatabasePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live manager, if `launch()` has run and `land()` has not.
    pub async fn manager(&self) -> Option<ManagerHandle> {
        self.manager.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for DatabasePlugin {
    fn name(&self) -> &'static str {
        "Database"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["Network"]
    }

    async fn check_ready(&self, ctx: &AppContext) -> ReadinessVerdict {
        if ctx.config.databases.is_empty() {
            return ReadinessVerdict {
                subsystem: self.name().to_string(),
                ready: true,
                messages: vec!["no databases configured, queue manager starts empty".to_string()],
            };
        }
        let messages: Vec<String> = ctx
            .config
            .databases
            .iter()
            .filter(|db| db.dsn.is_empty())
            .map(|db| format!("database '{}' has an empty dsn", db.database_name))
            .collect();
        if messages.is_empty() {
            ReadinessVerdict::ready(self.name())
        } else {
            ReadinessVerdict {
                subsystem: self.name().to_string(),
                ready: false,
                messages,
            }
        }
    }

    async fn launch(&self, ctx: &AppContext) -> bool {
        let manager = DatabaseQueueManager::new(ctx.config.databases.clone(), SystemClock);
        *self.manager.lock().await = Some(Arc::new(manager));
        info!(
            subsystem = self.name(),
            databases = ctx.config.databases.len(),
            "database queue manager up"
        );
        true
    }

    async fn land(&self, _ctx: &AppContext) -> bool {
        let manager = self.manager.lock().await.take();
        if let Some(manager) = manager {
            match Arc::try_unwrap(manager) {
                Ok(manager) => manager.shutdown().await,
                Err(_) => warn!(
                    subsystem = self.name(),
                    "manager still has outstanding handles at landing time, leaking lead queues"
                ),
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::Config;

    #[tokio::test]
    async fn launch_with_no_databases_configured_still_succeeds() {
        let ctx = AppContext::new(Config::default());
        let plugin = DatabasePlugin::new();
        assert!(plugin.launch(&ctx).await);
        assert!(plugin.manager().await.is_some());
        assert!(plugin.land(&ctx).await);
        assert!(plugin.manager().await.is_none());
    }

    #[tokio::test]
    async fn check_ready_flags_empty_dsn() {
        use hydrogen_core::{DatabaseConfig, DatabaseEngine};

        let mut config = Config::default();
        config.databases.push(DatabaseConfig {
            database_name: "printerdb".to_string(),
            engine: DatabaseEngine::Sqlite,
            dsn: String::new(),
            slow_workers: 0,
            medium_workers: 0,
            fast_workers: 0,
            cache_workers: 0,
            heartbeat_interval_ms: 5_000,
            dispatch_batch: 16,
            pending_result_ttl_ms: 30_000,
            prepared_cache_capacity: 100,
        });
        let ctx = AppContext::new(config);
        let plugin = DatabasePlugin::new();
        let verdict = plugin.check_ready(&ctx).await;
        assert!(!verdict.ready);
        assert!(!verdict.messages.is_empty());
    }
}
