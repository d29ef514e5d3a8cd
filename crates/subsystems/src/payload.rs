// SPDX-License-Identifier: MIT

//! `Payload` (spec §3): the device's job payload store (G-code and other
//! print artifacts), layered over `Database`. G-code parsing is a
//! Non-goal (spec §1).

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct PayloadPlugin {
    task: BackgroundTask,
}

impl PayloadPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for PayloadPlugin {
    fn name(&self) -> &'static str {
        "Payload"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["Database"]
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
    async fn depends_on_database() {
        let plugin = PayloadPlugin::new();
        assert_eq!(plugin.dependencies(), &["Database"]);
        let ctx = AppContext::new(Config::default());
        assert!(plugin.launch(&ctx).await);
        assert!(plugin.land(&ctx).await);
    }
}
