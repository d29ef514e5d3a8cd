// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use hydrogen_core::AppContext;
use hydrogen_core::SubsystemState;
use hydrogen_readiness::SubsystemPlugin;
use hydrogen_registry::SubsystemRegistry;
use tracing::{info, warn};

use crate::topo::topological_order;

const REGISTRY_SUBSYSTEM: &str = "Registry";

/// C5 Landing Planner's output: the subset of subsystem names to land
/// this cycle, in reverse-topological visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandingPlan {
    pub names: Vec<String>,
}

pub struct LandingPlanner;

impl LandingPlanner {
    /// Every currently non-`Inactive`, non-`"Registry"` subsystem is a
    /// landing candidate (spec §4.5); the executor enforces ordering and
    /// the "unknown name skipped" rule.
    pub fn plan(registry: &SubsystemRegistry) -> LandingPlan {
        let mut names = Vec::new();
        for id in registry.all_ids() {
            let Some(name) = registry.name_of(id) else {
                continue;
            };
            if name == REGISTRY_SUBSYSTEM {
                continue;
            }
            if registry.lookup_state(id) != Some(SubsystemState::Inactive) {
                names.push(name);
            }
        }
        LandingPlan { names }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingOutcome {
    pub subsystem: String,
}

pub struct LandingExecutor;

impl LandingExecutor {
    /// Land every candidate subsystem in reverse topological order (spec
    /// §4.5): a subsystem is landed only after every subsystem that
    /// depends on it is already `Inactive`. `land()` is best-effort —
    /// its own `Err`/`false` result never aborts the pass, and the
    /// subsystem is forced to `Inactive` afterward regardless.
    pub async fn execute(
        plan: &LandingPlan,
        registry: &SubsystemRegistry,
        plugins: &HashMap<String, Arc<dyn SubsystemPlugin>>,
        ctx: &AppContext,
    ) -> Vec<LandingOutcome> {
        let candidates: HashSet<&str> = plan.names.iter().map(String::as_str).collect();
        let mut outcomes = Vec::new();

        for id in topological_order(registry).into_iter().rev() {
            let Some(name) = registry.name_of(id) else {
                continue;
            };
            if name == REGISTRY_SUBSYSTEM || !candidates.contains(name.as_str()) {
                continue;
            }
            if !registry.is_landable(id) {
                info!(subsystem = %name, "skipped: dependents still active");
                continue;
            }
            let Some(plugin) = plugins.get(&name) else {
                warn!(subsystem = %name, "landing candidate but no plugin registered");
                continue;
            };

            // `is_landable` guarantees `id` is currently `Running`.
            let _ = registry.set_state(id, SubsystemState::Stopping);
            // land() is best-effort success regardless of the reported
            // outcome (spec §4.5): force Inactive afterward either way.
            let _ = plugin.land(ctx).await;
            let _ = registry.set_state(id, SubsystemState::Inactive);
            info!(subsystem = %name, "landed");
            outcomes.push(LandingOutcome { subsystem: name });
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
        lands_ok: bool,
    }

    #[async_trait::async_trait]
    impl SubsystemPlugin for StubPlugin {
        fn name(&self) -> &'static str {
            self.name
        }
        fn dependencies(&self) -> &'static [&'static str] {
            &[]
        }
        async fn check_ready(&self, _ctx: &AppContext) -> ReadinessVerdict {
            ReadinessVerdict::ready(self.name)
        }
        async fn launch(&self, _ctx: &AppContext) -> bool {
            true
        }
        async fn land(&self, _ctx: &AppContext) -> bool {
            self.lands_ok
        }
    }

    fn ctx() -> AppContext {
        AppContext::new(Config::default())
    }

    fn running_chain() -> (SubsystemRegistry, HashMap<String, Arc<dyn SubsystemPlugin>>) {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        let c = reg.register("C", &["B"]).unwrap();
        for id in [a, b, c] {
            reg.set_state(id, SubsystemState::Starting).unwrap();
            reg.set_state(id, SubsystemState::Running).unwrap();
        }
        let mut plugins: HashMap<String, Arc<dyn SubsystemPlugin>> = HashMap::new();
        plugins.insert(
            "A".to_string(),
            Arc::new(StubPlugin {
                name: "A",
                lands_ok: true,
            }) as Arc<dyn SubsystemPlugin>,
        );
        plugins.insert(
            "B".to_string(),
            Arc::new(StubPlugin {
                name: "B",
                lands_ok: true,
            }) as Arc<dyn SubsystemPlugin>,
        );
        plugins.insert(
            "C".to_string(),
            Arc::new(StubPlugin {
                name: "C",
                lands_ok: false,
            }) as Arc<dyn SubsystemPlugin>,
        );
        (reg, plugins)
    }

    #[tokio::test]
    async fn s1_landing_order_is_reverse_topological() {
        let (reg, plugins) = running_chain();
        let plan = LandingPlanner::plan(&reg);
        let outcomes = LandingExecutor::execute(&plan, &reg, &plugins, &ctx()).await;
        let order: Vec<&str> = outcomes.iter().map(|o| o.subsystem.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
        for id in reg.all_ids() {
            assert_eq!(reg.lookup_state(id), Some(SubsystemState::Inactive));
        }
    }

    #[tokio::test]
    async fn land_failure_still_forces_inactive() {
        let (reg, plugins) = running_chain();
        let plan = LandingPlanner::plan(&reg);
        LandingExecutor::execute(&plan, &reg, &plugins, &ctx()).await;
        let c = reg.get_by_name("C").unwrap();
        assert_eq!(reg.lookup_state(c), Some(SubsystemState::Inactive));
    }

    #[test]
    fn planner_skips_registry_and_already_inactive() {
        let reg = SubsystemRegistry::new();
        reg.register("Registry", &[]).unwrap();
        let a = reg.register("A", &[]).unwrap();
        reg.set_state(a, SubsystemState::Starting).unwrap();
        reg.set_state(a, SubsystemState::Running).unwrap();

        let plan = LandingPlanner::plan(&reg);
        assert_eq!(plan.names, vec!["A".to_string()]);
    }
}
