// SPDX-License-Identifier: MIT

//! `Network` (spec §3 SubsystemIdentity): the base network stack most
//! other subsystems depend on. Interface binding itself is a Non-goal;
//! this plug-in exists so dependents gate correctly on it in the
//! registry's dependency graph.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};
use tracing::info;

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct NetworkPlugin {
    task: BackgroundTask,
}

impl NetworkPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for NetworkPlugin {
    fn name(&self) -> &'static str {
        "Network"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
        ReadinessVerdict::ready(self.name())
    }

    async fn launch(&self, _ctx: &AppContext) -> bool {
        self.task.spawn(|token| idle_until_cancelled(token, HEARTBEAT));
        info!(subsystem = self.name(), "network stack up");
        true
    }

    async fn land(&self, _ctx: &AppContext) -> bool {
        self.task.stop().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::Config;

    fn ctx() -> AppContext {
        AppContext::new(Config::default())
    }

    #[tokio::test]
    async fn launch_then_land_stops_the_background_task() {
        let plugin = NetworkPlugin::new();
        assert!(plugin.launch(&ctx()).await);
        assert!(plugin.task.is_running());
        assert!(plugin.land(&ctx()).await);
        assert!(!plugin.task.is_running());
    }

    #[tokio::test]
    async fn land_without_launch_is_harmless() {
        let plugin = NetworkPlugin::new();
        assert!(plugin.land(&ctx()).await);
    }
}
