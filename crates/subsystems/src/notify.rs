// SPDX-License-Identifier: MIT

//! `Notify` (spec §3): push/desktop notifications for job and print
//! events. Notification transport specifics are a Non-goal here.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct NotifyPlugin {
    task: BackgroundTask,
}

impl NotifyPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for NotifyPlugin {
    fn name(&self) -> &'static str {
        "Notify"
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
        let plugin = NotifyPlugin::new();
        assert!(plugin.launch(&ctx).await);
        assert!(plugin.land(&ctx).await);
    }
}
