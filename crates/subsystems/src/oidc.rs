// SPDX-License-Identifier: MIT

//! `OIDC` (spec §3): the API's OpenID Connect auth layer, over `API`.
//! Token verification and provider discovery are a Non-goal here.

use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

use crate::support::{idle_until_cancelled, BackgroundTask};

const HEARTBEAT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct OidcPlugin {
    task: BackgroundTask,
}

impl OidcPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for OidcPlugin {
    fn name(&self) -> &'static str {
        "OIDC"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["API"]
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
    async fn depends_on_api() {
        let plugin = OidcPlugin::new();
        assert_eq!(plugin.dependencies(), &["API"]);
        let ctx = AppContext::new(Config::default());
        assert!(plugin.launch(&ctx).await);
        assert!(plugin.land(&ctx).await);
    }
}
