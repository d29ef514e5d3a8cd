// SPDX-License-Identifier: MIT

//! `WebSocket` (spec §3): the WebSocket/PTY bridge. Frame handling is a
//! Non-goal here.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct WebSocketPlugin {
    task: BackgroundTask,
}

impl WebSocketPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for WebSocketPlugin {
    fn name(&self) -> &'static str {
        "WebSocket"
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
