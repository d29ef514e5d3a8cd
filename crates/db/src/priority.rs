// SPDX-License-Identifier: MIT

/// Child queue priority class (spec §3, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueuePriority {
    Slow,
    Medium,
    Fast,
    Cache,
}

/// Lead vs. child queue kind, including `queue_number` convention (spec
/// §3 invariant 3: `is_lead_queue ⇒ queue_number = 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Lead,
    Slow,
    Medium,
    Fast,
    Cache,
}

impl From<QueuePriority> for QueueKind {
    fn from(priority: QueuePriority) -> Self {
        match priority {
            QueuePriority::Slow => QueueKind::Slow,
            QueuePriority::Medium => QueueKind::Medium,
            QueuePriority::Fast => QueueKind::Fast,
            QueuePriority::Cache => QueueKind::Cache,
        }
    }
}
