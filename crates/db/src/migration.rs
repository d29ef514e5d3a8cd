// SPDX-License-Identifier: MIT

//! Migration watermark decision table (spec §4.7.3, §8 invariant 6,
//! scenario S3): a pure function of the three watermarks.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    None,
    Load,
    Apply,
}

/// Watermarks obey `applied ≤ loaded ≤ available` in steady state (spec
/// §3 invariant 4); the `available < loaded` row is pathological and the
/// action is `None` (refuse to act) rather than guessed at.
pub fn determine_action(available: u64, loaded: u64, applied: u64) -> MigrationAction {
    if available == loaded && loaded == applied {
        MigrationAction::None
    } else if available > loaded {
        MigrationAction::Load
    } else if available == loaded && loaded > applied {
        MigrationAction::Apply
    } else {
        // available < loaded: pathological excursion, refuse to act.
        MigrationAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_migration_decision_table() {
        assert_eq!(determine_action(1000, 1000, 1000), MigrationAction::None);
        assert_eq!(determine_action(1000, 0, 0), MigrationAction::Load);
        assert_eq!(determine_action(1005, 1000, 1000), MigrationAction::Load);
        assert_eq!(determine_action(1000, 1000, 999), MigrationAction::Apply);
        assert_eq!(determine_action(999, 1000, 1000), MigrationAction::None);
    }

    proptest::proptest! {
        #[test]
        fn determine_action_is_pure(
            available in 0u64..2000,
            loaded in 0u64..2000,
            applied in 0u64..2000,
        ) {
            let a = determine_action(available, loaded, applied);
            let b = determine_action(available, loaded, applied);
            prop_assert_eq!(a, b);
        }
    }
}
