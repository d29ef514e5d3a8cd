// SPDX-License-Identifier: MIT

//! `Swagger` (spec §3): the API's OpenAPI document/UI, layered over
//! `API`. Document generation is a Non-goal here.

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};

#[derive(Default)]
pub struct SwaggerPlugin;

impl SwaggerPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for SwaggerPlugin {
    fn name(&self) -> &'static str {
        "Swagger"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["API"]
    }

    async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
        ReadinessVerdict::ready(self.name())
    }

    async fn launch(&self, _ctx: &AppContext) -> bool {
        true
    }

    async fn land(&self, _ctx: &AppContext) -> bool {
        true
    }
}
