// SPDX-License-Identifier: MIT

//! The subsystem plug-in contract (spec §6.1), expressed as a trait
//! instead of the source's raw function-pointer record (spec §9 Design
//! Notes: function-pointer driver dispatch -> trait/interface).

use hydrogen_core::AppContext;

use crate::verdict::ReadinessVerdict;

/// Each external subsystem supplies an implementation of this trait.
///
/// `launch` may spawn threads/tasks before returning but MUST NOT block
/// indefinitely. `land` MUST be idempotent and return within a bounded
/// time.
#[async_trait::async_trait]
pub trait SubsystemPlugin: Send + Sync {
    /// Stable name matching spec §3's SubsystemIdentity list.
    fn name(&self) -> &'static str;

    /// Names of subsystems that must reach `Running` before this one may
    /// start.
    fn dependencies(&self) -> &'static [&'static str];

    /// Pure with respect to subsystem state; may read configuration and
    /// perform fast local probes. MUST NOT open sockets, spawn
    /// threads/tasks, or mutate configuration (spec §4.2).
    async fn check_ready(&self, ctx: &AppContext) -> ReadinessVerdict;

    /// Returns `true` on success, `false` on failure.
    async fn launch(&self, ctx: &AppContext) -> bool;

    /// Always returns `true` (landing is best-effort, spec §4.5).
    async fn land(&self, ctx: &AppContext) -> bool;
}
