// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use hydrogen_core::AppContext;
use hydrogen_core::SubsystemState;
use hydrogen_readiness::{ReadinessBatch, SubsystemPlugin};
use hydrogen_registry::SubsystemRegistry;
use tracing::{info, warn};

use crate::topo::topological_order;

const REGISTRY_SUBSYSTEM: &str = "Registry";

/// C3 Launch Planner's output: the subset of subsystem names admitted for
/// this cycle, plus whether a batch was supplied at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchPlan {
    pub admitted: Vec<String>,
    pub batch_present: bool,
}

pub struct LaunchPlanner;

impl LaunchPlanner {
    /// Convert a `ReadinessBatch` into the subset of subsystems to admit
    /// this cycle (spec §4.3). `"Registry"` is always excluded.
    pub fn plan(batch: Option<&ReadinessBatch>) -> LaunchPlan {
        let Some(batch) = batch else {
            return LaunchPlan {
                admitted: Vec::new(),
                batch_present: false,
            };
        };
        if !batch.any_ready {
            return LaunchPlan {
                admitted: Vec::new(),
                batch_present: true,
            };
        }
        let admitted = batch
            .verdicts
            .iter()
            .filter(|v| v.ready && v.subsystem != REGISTRY_SUBSYSTEM)
            .map(|v| v.subsystem.clone())
            .collect();
        LaunchPlan {
            admitted,
            batch_present: true,
        }
    }
}

/// Outcome of attempting to launch one subsystem in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub subsystem: String,
    pub launched: bool,
}

pub struct LaunchExecutor;

impl LaunchExecutor {
    /// Launch every admitted subsystem in dependency order (spec §4.4).
    ///
    /// Visits the registry's global topological order (ties broken by
    /// registration order) and, for each admitted name, attempts the
    /// launch only once its dependencies have already reached `Running`
    /// within this same pass — this is what lets a dependent admitted in
    /// the same batch as its dependency start in the same cycle (spec §9
    /// Open Questions: same-cycle admission in dependency order).
    pub async fn execute(
        plan: &LaunchPlan,
        registry: &SubsystemRegistry,
        plugins: &HashMap<String, Arc<dyn SubsystemPlugin>>,
        ctx: &AppContext,
    ) -> Vec<LaunchOutcome> {
        let admitted: HashSet<&str> = plan.admitted.iter().map(String::as_str).collect();
        let mut outcomes = Vec::new();

        for id in topological_order(registry) {
            let Some(name) = registry.name_of(id) else {
                continue;
            };
            if name == REGISTRY_SUBSYSTEM || !admitted.contains(name.as_str()) {
                continue;
            }
            if !registry.is_launchable(id) {
                info!(subsystem = %name, "skipped: not launchable this cycle");
                continue;
            }
            let Some(plugin) = plugins.get(&name) else {
                warn!(subsystem = %name, "admitted but no plugin registered");
                continue;
            };

            if registry.set_state(id, SubsystemState::Starting).is_err() {
                continue;
            }
            let launched = plugin.launch(ctx).await;
            if launched {
                let _ = registry.set_state(id, SubsystemState::Running);
                info!(subsystem = %name, "launched");
            } else {
                let _ = registry.set_state(id, SubsystemState::Error);
                warn!(subsystem = %name, "launch failed");
            }
            outcomes.push(LaunchOutcome {
                subsystem: name,
                launched,
            });
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::Config;
    use hydrogen_readiness::ReadinessVerdict;

    struct StubPlugin {
        name: &'static str,
        deps: &'static [&'static str],
        succeeds: bool,
    }

    #[async_trait::async_trait]
    impl SubsystemPlugin for StubPlugin {
        fn name(&self) -> &'static str {
            self.name
        }
        fn dependencies(&self) -> &'static [&'static str] {
            self.deps
        }
        async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
            ReadinessVerdict::ready(self.name)
        }
        async fn launch(&self, _ctx: &AppContext) -> bool {
            self.succeeds
        }
        async fn land(&self, _ctx: &AppContext) -> bool {
            true
        }
    }

    fn ctx() -> AppContext {
        AppContext::new(Config::default())
    }

    #[test]
    fn planner_returns_empty_and_absent_when_batch_missing() {
        let plan = LaunchPlanner::plan(None);
        assert!(!plan.batch_present);
        assert!(plan.admitted.is_empty());
    }

    #[test]
    fn planner_excludes_registry_and_not_ready() {
        let batch = ReadinessBatch::from_verdicts(vec![
            ReadinessVerdict::ready("Registry"),
            ReadinessVerdict::ready("WebServer"),
            ReadinessVerdict::not_ready("MDNSServer", "port busy"),
        ]);
        let plan = LaunchPlanner::plan(Some(&batch));
        assert!(plan.batch_present);
        assert_eq!(plan.admitted, vec!["WebServer".to_string()]);
    }

    #[test]
    fn planner_returns_empty_when_none_ready() {
        let batch = ReadinessBatch::from_verdicts(vec![ReadinessVerdict::not_ready("X", "no")]);
        let plan = LaunchPlanner::plan(Some(&batch));
        assert!(plan.batch_present);
        assert!(plan.admitted.is_empty());
    }

    #[tokio::test]
    async fn s1_admission_order_is_dependency_order() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        let c = reg.register("C", &["B"]).unwrap();
        let _ = (a, b, c);

        let mut plugins: HashMap<String, Arc<dyn SubsystemPlugin>> = HashMap::new();
        for name in ["A", "B", "C"] {
            plugins.insert(
                name.to_string(),
                Arc::new(StubPlugin {
                    name: Box::leak(name.to_string().into_boxed_str()),
                    deps: &[],
                    succeeds: true,
                }) as Arc<dyn SubsystemPlugin>,
            );
        }

        let plan = LaunchPlan {
            admitted: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            batch_present: true,
        };
        let outcomes = LaunchExecutor::execute(&plan, &reg, &plugins, &ctx()).await;
        let order: Vec<&str> = outcomes.iter().map(|o| o.subsystem.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert!(outcomes.iter().all(|o| o.launched));
    }

    #[tokio::test]
    async fn s2_same_cycle_admission_in_dependency_order() {
        let reg = SubsystemRegistry::new();
        reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        let c = reg.register("C", &["A"]).unwrap();

        let mut plugins: HashMap<String, Arc<dyn SubsystemPlugin>> = HashMap::new();
        for name in ["A", "B", "C"] {
            plugins.insert(
                name.to_string(),
                Arc::new(StubPlugin {
                    name: Box::leak(name.to_string().into_boxed_str()),
                    deps: &[],
                    succeeds: true,
                }) as Arc<dyn SubsystemPlugin>,
            );
        }

        // B is not ready this batch; A and C are.
        let plan = LaunchPlan {
            admitted: vec!["A".to_string(), "C".to_string()],
            batch_present: true,
        };
        LaunchExecutor::execute(&plan, &reg, &plugins, &ctx()).await;

        assert_eq!(
            reg.lookup_state(reg.get_by_name("A").unwrap()),
            Some(SubsystemState::Running)
        );
        assert_eq!(reg.lookup_state(b), Some(SubsystemState::Inactive));
        assert_eq!(reg.lookup_state(c), Some(SubsystemState::Running));
    }

    #[tokio::test]
    async fn failed_launch_transitions_to_error() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();

        let mut plugins: HashMap<String, Arc<dyn SubsystemPlugin>> = HashMap::new();
        plugins.insert(
            "A".to_string(),
            Arc::new(StubPlugin {
                name: "A",
                deps: &[],
                succeeds: false,
            }) as Arc<dyn SubsystemPlugin>,
        );

        let plan = LaunchPlan {
            admitted: vec!["A".to_string()],
            batch_present: true,
        };
        let outcomes = LaunchExecutor::execute(&plan, &reg, &plugins, &ctx()).await;
        assert!(!outcomes[0].launched);
        assert_eq!(reg.lookup_state(a), Some(SubsystemState::Error));
    }
}
