// SPDX-License-Identifier: MIT

//! `Resources` (spec §3): the background collector that refreshes the C9
//! `SubsystemThreadTable`'s aggregate `{virtual_memory, resident_memory,
//! memory_percent}` on a configurable interval. Reads `/proc/self/status`
//! on Linux; a portable fallback reports zeros elsewhere rather than
//! pulling in a full `sysinfo` dependency.

use std::sync::Arc;
use std::time::Duration;

use hydrogen_core::AppContext;
use hydrogen_readiness::{ReadinessVerdict, SubsystemPlugin};
use hydrogen_registry::{AggregateMetrics, SubsystemThreadTable};
use tokio_util::sync::CancellationToken;

use crate::support::BackgroundTask;

const COLLECTION_INTERVAL: Duration = Duration::from_secs(10);

pub struct ResourcesPlugin {
    table: Arc<SubsystemThreadTable>,
    task: BackgroundTask,
}

impl ResourcesPlugin {
    pub fn new(table: Arc<SubsystemThreadTable>) -> Self {
        Self {
            table,
            task: BackgroundTask::new(),
        }
    }
}

async fn collect_once(table: &SubsystemThreadTable) {
    table.set_aggregate(read_self_status());
}

async fn collect_loop(table: Arc<SubsystemThreadTable>, token: CancellationToken) {
    loop {
        collect_once(&table).await;
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(COLLECTION_INTERVAL) => {}
        }
    }
}

#[cfg(target_os = "linux")]
fn read_self_status() -> AggregateMetrics {
    let Ok(contents) = std::fs::read_to_string("/proc/self/status") else {
        return AggregateMetrics::default();
    };
    let mut vm_kb = 0u64;
    let mut rss_kb = 0u64;
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("VmSize:") {
            vm_kb = parse_kb_field(rest);
        } else if let Some(rest) = line.strip_prefix("VmRSS:") {
            rss_kb = parse_kb_field(rest);
        }
    }
    let total_kb = total_memory_kb();
    let memory_percent = if total_kb > 0 {
        (rss_kb as f32 / total_kb as f32) * 100.0
    } else {
        0.0
    };
    AggregateMetrics {
        virtual_memory_bytes: vm_kb * 1024,
        resident_memory_bytes: rss_kb * 1024,
        memory_percent,
    }
}

#[cfg(target_os = "linux")]
fn parse_kb_field(rest: &str) -> u64 {
    rest.split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[cfg(target_os = "linux")]
fn total_memory_kb() -> u64 {
    let Ok(contents) = std::fs::read_to_string("/proc/meminfo") else {
        return 0;
    };
    contents
        .lines()
        .find_map(|line| line.strip_prefix("MemTotal:"))
        .map(parse_kb_field)
        .unwrap_or(0)
}

#[cfg(not(target_os = "linux"))]
fn read_self_status() -> AggregateMetrics {
    AggregateMetrics::default()
}

#[async_trait::async_trait]
impl SubsystemPlugin for ResourcesPlugin {
    fn name(&self) -> &'static str {
        "Resources"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["Threads"]
    }

    async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
        ReadinessVerdict::ready(self.name())
    }

    async fn launch(&self, _ctx: &AppContext) -> bool {
        let table = self.table.clone();
        self.task
            .spawn(move |token| collect_loop(table, token));
        true
    }

    async fn land(&self, _ctx: &AppContext) -> bool {
        self.task.stop().await;
        true
    }
}
