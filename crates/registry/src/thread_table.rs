// SPDX-License-Identifier: MIT

use parking_lot::RwLock;

/// Fixed capacity per spec §4.9: attempts to add beyond this many threads
/// for one subsystem are silently ignored.
pub const MAX_SERVICE_THREADS: usize = 32;

/// Per-thread resource metrics, refreshed by the metrics collector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreadMetrics {
    pub cpu_percent: f32,
    pub resident_memory_bytes: u64,
}

/// One worker thread registered against a subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceThread {
    pub thread_id: u64,
    pub tid: u32,
    pub metrics: ThreadMetrics,
}

#[derive(Default)]
struct SubsystemThreads {
    threads: Vec<ServiceThread>,
}

/// C9 Subsystem Thread Table: a fixed-capacity per-subsystem array of
/// `{thread_id, tid, metrics}` triples plus aggregate
/// `{virtual_memory, resident_memory, memory_percent}`.
///
/// Aggregate totals are written only by the metrics collector
/// (`set_aggregate`); `add_service_thread`/`remove_service_thread` never
/// touch them.
pub struct SubsystemThreadTable {
    by_subsystem: RwLock<std::collections::HashMap<usize, SubsystemThreads>>,
    aggregate: RwLock<AggregateMetrics>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateMetrics {
    pub virtual_memory_bytes: u64,
    pub resident_memory_bytes: u64,
    pub memory_percent: f32,
}

impl Default for SubsystemThreadTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SubsystemThreadTable {
    pub fn new() -> Self {
        Self {
            by_subsystem: RwLock::new(std::collections::HashMap::new()),
            aggregate: RwLock::new(AggregateMetrics::default()),
        }
    }

    /// Append a thread for `subsystem_id`. A no-op (count unchanged) once
    /// the subsystem already holds `MAX_SERVICE_THREADS` entries.
    pub fn add_service_thread(&self, subsystem_id: usize, thread: ServiceThread) {
        let mut table = self.by_subsystem.write();
        let entry = table.entry(subsystem_id).or_default();
        if entry.threads.len() >= MAX_SERVICE_THREADS {
            return;
        }
        entry.threads.push(thread);
    }

    /// Remove a thread by id, compacting the array and clearing the freed
    /// slot's metrics implicitly (the slot no longer exists).
    pub fn remove_service_thread(&self, subsystem_id: usize, thread_id: u64) {
        if let Some(entry) = self.by_subsystem.write().get_mut(&subsystem_id) {
            entry.threads.retain(|t| t.thread_id != thread_id);
        }
    }

    pub fn thread_count(&self, subsystem_id: usize) -> usize {
        self.by_subsystem
            .read()
            .get(&subsystem_id)
            .map(|e| e.threads.len())
            .unwrap_or(0)
    }

    pub fn threads(&self, subsystem_id: usize) -> Vec<ServiceThread> {
        self.by_subsystem
            .read()
            .get(&subsystem_id)
            .map(|e| e.threads.clone())
            .unwrap_or_default()
    }

    /// Written by the metrics collector only.
    pub fn set_aggregate(&self, metrics: AggregateMetrics) {
        *self.aggregate.write() = metrics;
    }

    pub fn aggregate(&self) -> AggregateMetrics {
        *self.aggregate.read()
    }
}
