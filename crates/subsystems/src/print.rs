// SPDX-License-Identifier: MIT

//! `Print` (spec §3): the device's print-job submission path. Spooler and
//! printer-protocol internals are a Non-goal (spec §1).

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct PrintPlugin {
    task: BackgroundTask,
}

impl PrintPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for PrintPlugin {
    fn name(&self) -> &'static str {
        "Print"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["Network"]
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
        let plugin = PrintPlugin::new();
        assert!(plugin.launch(&ctx).await);
        assert!(plugin.land(&ctx).await);
    }
}
