// SPDX-License-Identifier: MIT

//! `WebServer` (spec §3): HTTP dispatch. Wire-level request handling is a
//! Non-goal (spec §1); this plug-in only carries the lifecycle.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct WebServerPlugin {
    task: BackgroundTask,
}

impl WebServerPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for WebServerPlugin {
    fn name(&self) -> &'static str {
        "WebServer"
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
