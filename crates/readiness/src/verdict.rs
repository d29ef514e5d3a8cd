// SPDX-License-Identifier: MIT

//! `ReadinessVerdict` / `ReadinessBatch` (spec §3).

/// Output of a subsystem's pre-launch self-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessVerdict {
    pub subsystem: String,
    pub ready: bool,
    pub messages: Vec<String>,
}

impl ReadinessVerdict {
    pub fn ready(subsystem: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            ready: true,
            messages: Vec::new(),
        }
    }

    pub fn not_ready(subsystem: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            ready: false,
            messages: vec![message.into()],
        }
    }
}

/// An insertion-ordered sequence of verdicts plus aggregate counters. The
/// counters are always consistent with the verdict list; `any_ready` is
/// authoritative (the Launch Planner consults it directly, spec §4.3).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessBatch {
    pub verdicts: Vec<ReadinessVerdict>,
    pub total_checked: usize,
    pub total_ready: usize,
    pub total_not_ready: usize,
    pub any_ready: bool,
}

impl ReadinessBatch {
    pub fn from_verdicts(verdicts: Vec<ReadinessVerdict>) -> Self {
        let total_checked = verdicts.len();
        let total_ready = verdicts.iter().filter(|v| v.ready).count();
        let total_not_ready = total_checked - total_ready;
        let any_ready = total_ready > 0;
        Self {
            verdicts,
            total_checked,
            total_ready,
            total_not_ready,
            any_ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_consistent_with_verdicts() {
        let batch = ReadinessBatch::from_verdicts(vec![
            ReadinessVerdict::ready("A"),
            ReadinessVerdict::not_ready("B", "port in use"),
            ReadinessVerdict::ready("C"),
        ]);
        assert_eq!(batch.total_checked, 3);
        assert_eq!(batch.total_ready, 2);
        assert_eq!(batch.total_not_ready, 1);
        assert!(batch.any_ready);
    }

    #[test]
    fn empty_batch_has_any_ready_false() {
        let batch = ReadinessBatch::from_verdicts(vec![]);
        assert!(!batch.any_ready);
        assert_eq!(batch.total_checked, 0);
    }
}
