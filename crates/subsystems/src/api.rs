// SPDX-License-Identifier: MIT

//! `API` (spec §3): the programmatic HTTP API surface, layered over
//! `WebServer`. Route handling is a Non-goal here.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct ApiPlugin {
    task: BackgroundTask,
}

impl ApiPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for ApiPlugin {
    fn name(&self) -> &'static str {
        "API"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["WebServer"]
    }

    async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
        ReadinessVerdict::ready(self.name())
    }

    async fn launch(&self, _ctx: &AppContext) -> bool {
        self.task.spawn(|token| idle_until_cancelled(token, HEARTBEAT));
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

    #[tokio::test]
    async fn launch_and_land_round_trip() {
        let ctx = AppContext::new(Config::default());
        let plugin = ApiPlugin::new();
        assert!(plugin.launch(&ctx).await);
        assert!(plugin.land(&ctx).await);
    }
}
