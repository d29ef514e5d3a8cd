// SPDX-License-Identifier: MIT

use std::sync::Arc;

use hydrogen_core::AppContext;
use tracing::warn;

use crate::plugin::SubsystemPlugin;
use crate::verdict::{ReadinessBatch, ReadinessVerdict};

/// C2 Readiness Evaluator: delegates to each subsystem's `check_ready()`
/// and assembles a `ReadinessBatch` in insertion order (spec §4.2).
pub struct ReadinessEvaluator;

impl ReadinessEvaluator {
    /// Run every plugin's readiness check and assemble the batch. A check
    /// that panics is recorded as `ready=false` with a synthetic message;
    /// the process continues (spec §4.2 failure semantics).
    pub async fn evaluate(
        plugins: &[Arc<dyn SubsystemPlugin>],
        ctx: &AppContext,
    ) -> ReadinessBatch {
        let mut verdicts = Vec::with_capacity(plugins.len());
        for plugin in plugins {
            let plugin = Arc::clone(plugin);
            let ctx = ctx.clone();
            let name = plugin.name();
            let joined = tokio::spawn(async move { plugin.check_ready(&ctx).await }).await;
            let verdict = match joined {
                Ok(verdict) => verdict,
                Err(join_err) => {
                    warn!(subsystem = name, error = %join_err, "readiness check failed internally");
                    ReadinessVerdict::not_ready(name, "check failed internally")
                }
            };
            verdicts.push(verdict);
        }
        ReadinessBatch::from_verdicts(verdicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::Config;

    struct AlwaysReady;
    #[async_trait::async_trait]
    impl SubsystemPlugin for AlwaysReady {
        fn name(&self) -> &'static str {
            "Always"
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

    struct PanicsOnCheck;
    #[async_trait::async_trait]
    impl SubsystemPlugin for PanicsOnCheck {
        fn name(&self) -> &'static str {
            "Panicky"
        }
        fn dependencies(&self) -> &'static [&'static str] {
            &[]
        }
        async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
            panic!("boom");
        }
        async fn launch(&self, _ctx: &AppContext) -> bool {
            true
        }
        async fn land(&self, _ctx: &AppContext) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn evaluate_preserves_insertion_order() {
        let ctx = AppContext::new(Config::default());
        let plugins: Vec<Arc<dyn SubsystemPlugin>> =
            vec![Arc::new(AlwaysReady), Arc::new(AlwaysReady)];
        let batch = ReadinessEvaluator::evaluate(&plugins, &ctx).await;
        assert_eq!(batch.verdicts.len(), 2);
        assert!(batch.any_ready);
    }

    #[tokio::test]
    async fn panicking_check_becomes_not_ready_and_process_continues() {
        let ctx = AppContext::new(Config::default());
        let plugins: Vec<Arc<dyn SubsystemPlugin>> =
            vec![Arc::new(PanicsOnCheck), Arc::new(AlwaysReady)];
        let batch = ReadinessEvaluator::evaluate(&plugins, &ctx).await;
        assert_eq!(batch.verdicts.len(), 2);
        assert!(!batch.verdicts[0].ready);
        assert_eq!(batch.verdicts[0].messages[0], "check failed internally");
        assert!(batch.verdicts[1].ready);
    }
}
