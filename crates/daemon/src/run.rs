// SPDX-License-Identifier: MIT

//! Drives one process run: repeated launch cycles until startup
//! converges (spec §4.3/§4.4), steady state until a shutdown signal
//! arrives, then repeated landing cycles in reverse order (spec §4.5).

use hydrogen_core::{AppContext, Config};
use hydrogen_orchestrator::{LandingExecutor, LandingPlanner, LaunchExecutor, LaunchPlanner};
use hydrogen_readiness::ReadinessEvaluator;
use tracing::{info, warn};

use crate::error::DaemonError;
use crate::wiring::{self, Wiring};

/// Whether the run ever brought at least one subsystem up (spec §7:
/// "the process exit code reflects whether any launch() returned
/// success; a partially-up process is allowed if at least one subsystem
/// launched").
pub struct RunOutcome {
    pub any_launched: bool,
}

/// Repeats the launch cycle until a pass admits nothing new or makes no
/// further progress, bounded by `max_cycles`. Each cycle lets one more
/// layer of the dependency graph become launchable (spec §9 Open
/// Questions: same-cycle admission within a layer, cross-layer
/// admission across cycles), so the registry's longest dependency chain
/// bounds convergence.
pub async fn launch_all(wiring: &Wiring, ctx: &AppContext, max_cycles: usize) -> bool {
    let mut any_launched = false;
    for cycle in 0..max_cycles {
        let batch = ReadinessEvaluator::evaluate(&wiring.ordered, ctx).await;
        let plan = LaunchPlanner::plan(Some(&batch));
        if plan.admitted.is_empty() {
            info!(cycle, "launch cycle admitted nothing, startup converged");
            break;
        }
        let outcomes = LaunchExecutor::execute(&plan, &wiring.registry, &wiring.plugins, ctx).await;
        let launched_this_cycle = outcomes.iter().filter(|o| o.launched).count();
        any_launched = any_launched || launched_this_cycle > 0;
        info!(
            cycle,
            admitted = plan.admitted.len(),
            launched = launched_this_cycle,
            "launch cycle complete"
        );
        if launched_this_cycle == 0 {
            // Everything admitted was skipped (its dependency isn't
            // Running yet, or it already failed) — spinning further
            // without a state change would just repeat this cycle.
            break;
        }
    }
    any_launched
}

/// Repeats the landing cycle (spec §4.5) until nothing is left active or
/// `max_cycles` is exhausted. `land()` is best-effort so every candidate
/// this sees is forced `Inactive` by the executor regardless of outcome.
pub async fn land_all(wiring: &Wiring, ctx: &AppContext, max_cycles: usize) {
    for cycle in 0..max_cycles {
        let plan = LandingPlanner::plan(&wiring.registry);
        if plan.names.is_empty() {
            info!(cycle, "landing converged, no subsystem still active");
            break;
        }
        let outcomes = LandingExecutor::execute(&plan, &wiring.registry, &wiring.plugins, ctx).await;
        info!(cycle, landed = outcomes.len(), "landing cycle complete");
    }
}

/// Runs the full process lifetime: launch to steady state, wait for
/// Ctrl-C, land everything, return whether anything ever launched.
pub async fn run(config: Config) -> Result<RunOutcome, DaemonError> {
    let ctx = AppContext::new(config);
    let wiring = wiring::build()?;
    let max_cycles = wiring.ordered.len() + 1;

    let any_launched = launch_all(&wiring, &ctx, max_cycles).await;

    info!("hydrogen daemon up, waiting for shutdown signal");
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c, shutting down anyway");
    }

    info!("shutdown requested, landing subsystems");
    land_all(&wiring, &ctx, max_cycles).await;

    Ok(RunOutcome { any_launched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrogen_core::SubsystemState;

    #[tokio::test]
    async fn launch_then_land_brings_every_subsystem_back_to_inactive() {
        let ctx = AppContext::new(Config::default());
        let wiring = wiring::build().unwrap();
        let max_cycles = wiring.ordered.len() + 1;

        let any_launched = launch_all(&wiring, &ctx, max_cycles).await;
        assert!(any_launched);
        for plugin in &wiring.ordered {
            let id = wiring.registry.get_by_name(plugin.name()).unwrap();
            assert_eq!(
                wiring.registry.lookup_state(id),
                Some(SubsystemState::Running),
                "{} did not converge to Running",
                plugin.name()
            );
        }

        land_all(&wiring, &ctx, max_cycles).await;
        for plugin in &wiring.ordered {
            let id = wiring.registry.get_by_name(plugin.name()).unwrap();
            assert_eq!(
                wiring.registry.lookup_state(id),
                Some(SubsystemState::Inactive),
                "{} did not land back to Inactive",
                plugin.name()
            );
        }
    }
}
