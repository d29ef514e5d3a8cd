// SPDX-License-Identifier: MIT

//! `Threads` (spec §3): owns the C9 `SubsystemThreadTable` shared by
//! every other subsystem's worker-thread bookkeeping. `Resources` reads
//! and refreshes it (see `resources.rs`); this plug-in just carries the
//! table's lifetime.

use std::sync::Arc;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};
use hydrogen_registry::SubsystemThreadTable;

#[derive(Clone)]
pub struct ThreadsPlugin {
    table: Arc<SubsystemThreadTable>,
}

impl ThreadsPlugin {
    pub fn new() -> Self {
        Self {
            table: Arc::new(SubsystemThreadTable::new()),
        }
    }

    pub fn table(&self) -> Arc<SubsystemThreadTable> {
        self.table.clone()
    }
}

impl Default for ThreadsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SubsystemPlugin for ThreadsPlugin {
    fn name(&self) -> &'static str {
        "Threads"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
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

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::Config;

    #[tokio::test]
    async fn exposes_a_shared_table_handle() {
        let ctx = AppContext::new(Config::default());
        let plugin = ThreadsPlugin::new();
        assert!(plugin.launch(&ctx).await);
        let table = plugin.table();
        assert_eq!(table.thread_count(0), 0);
    }
}
