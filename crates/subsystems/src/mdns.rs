// SPDX-License-Identifier: MIT

//! `MDNSServer` and `MDNSClient` (spec §3): the mDNS responder that
//! advertises the device and the client that discovers peers. DNS-SD
//! record encoding is a Non-goal (spec §1); these plug-ins carry only
//! the lifecycle.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct MdnsServerPlugin {
    task: BackgroundTask,
}

impl MdnsServerPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for MdnsServerPlugin {
    fn name(&self) -> &'static str {
        "MDNSServer"
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

#[derive(Default)]
pub struct MdnsClientPlugin {
    task: BackgroundTask,
}

impl MdnsClientPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for MdnsClientPlugin {
    fn name(&self) -> &'static str {
        "MDNSClient"
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
    async fn server_and_client_round_trip_independently() {
        let ctx = AppContext::new(Config::default());
        let server = MdnsServerPlugin::new();
        let client = MdnsClientPlugin::new();
        assert!(server.launch(&ctx).await);
        assert!(client.launch(&ctx).await);
        assert!(server.land(&ctx).await);
        assert!(client.land(&ctx).await);
    }
}
