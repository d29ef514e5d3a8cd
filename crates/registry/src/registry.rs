// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use hydrogen_core::SubsystemState;
use parking_lot::RwLock;

use crate::error::RegistryError;

/// Dense integer slot assigned to a subsystem at registration time, valid
/// for the process lifetime (spec §3 SubsystemIdentity).
pub type SubsystemId = usize;

struct Entry {
    name: String,
    state: SubsystemState,
    /// Prerequisite ids: this subsystem depends on each of these.
    dependencies: Vec<SubsystemId>,
    /// Ids of subsystems that declared a dependency on this one.
    dependents: Vec<SubsystemId>,
}

struct Inner {
    entries: Vec<Entry>,
    by_name: HashMap<String, SubsystemId>,
}

/// C1 Subsystem Registry: canonical table of subsystem identities, states,
/// dependency edges, and (via `hydrogen_registry::SubsystemThreadTable`,
/// kept separately) worker thread bookkeeping.
///
/// All operations are serialized by a single registry lock; readers may
/// take the shared variant (spec §4.1 Concurrency).
pub struct SubsystemRegistry {
    inner: RwLock<Inner>,
}

impl Default for SubsystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                by_name: HashMap::new(),
            }),
        }
    }

    /// Register a subsystem by name with a set of prerequisite names.
    ///
    /// Idempotent on `name`: a second call with the identical dependency
    /// set (by name, order-insensitive) returns the existing id. A second
    /// call with a different dependency set fails with
    /// `AlreadyRegisteredDifferentShape`. Every named dependency must
    /// already be registered, or this fails with `UnknownSubsystem`.
    pub fn register(
        &self,
        name: &str,
        dependency_names: &[&str],
    ) -> Result<SubsystemId, RegistryError> {
        let mut inner = self.inner.write();

        if let Some(&id) = inner.by_name.get(name) {
            let mut existing: Vec<&str> = inner.entries[id]
                .dependencies
                .iter()
                .map(|&d| inner.entries[d].name.as_str())
                .collect();
            let mut requested: Vec<&str> = dependency_names.to_vec();
            existing.sort_unstable();
            requested.sort_unstable();
            if existing == requested {
                return Ok(id);
            }
            return Err(RegistryError::AlreadyRegisteredDifferentShape(
                name.to_string(),
            ));
        }

        let mut dependencies = Vec::with_capacity(dependency_names.len());
        for dep_name in dependency_names {
            let dep_id = *inner
                .by_name
                .get(*dep_name)
                .ok_or_else(|| RegistryError::UnknownSubsystem((*dep_name).to_string()))?;
            dependencies.push(dep_id);
        }

        let id = inner.entries.len();
        inner.entries.push(Entry {
            name: name.to_string(),
            state: SubsystemState::Inactive,
            dependencies: dependencies.clone(),
            dependents: Vec::new(),
        });
        inner.by_name.insert(name.to_string(), id);
        for dep_id in dependencies {
            inner.entries[dep_id].dependents.push(id);
        }

        Ok(id)
    }

    /// Add a single dependency edge: `dependent_id` depends on
    /// `prerequisite_id`. Fails with `CycleDetected` if the edge would
    /// close a cycle, `UnknownSubsystem` if either id is unknown.
    pub fn add_dependency(
        &self,
        dependent_id: SubsystemId,
        prerequisite_id: SubsystemId,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        if dependent_id >= inner.entries.len() {
            return Err(RegistryError::UnknownSubsystem(format!("#{dependent_id}")));
        }
        if prerequisite_id >= inner.entries.len() {
            return Err(RegistryError::UnknownSubsystem(format!(
                "#{prerequisite_id}"
            )));
        }

        if Self::reaches(&inner.entries, prerequisite_id, dependent_id) {
            return Err(RegistryError::CycleDetected);
        }

        if !inner.entries[dependent_id]
            .dependencies
            .contains(&prerequisite_id)
        {
            inner.entries[dependent_id].dependencies.push(prerequisite_id);
            inner.entries[prerequisite_id].dependents.push(dependent_id);
        }
        Ok(())
    }

    /// DFS: can `from` reach `target` by following dependency edges?
    fn reaches(entries: &[Entry], from: SubsystemId, target: SubsystemId) -> bool {
        let mut stack = vec![from];
        let mut seen = vec![false; entries.len()];
        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if seen[node] {
                continue;
            }
            seen[node] = true;
            stack.extend(entries[node].dependencies.iter().copied());
        }
        false
    }

    /// Validate and apply a state transition. Leaves state unchanged on
    /// an illegal transition.
    pub fn set_state(
        &self,
        id: SubsystemId,
        new_state: SubsystemState,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        let entry = inner
            .entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownSubsystem(format!("#{id}")))?;
        if !entry.state.can_transition_to(new_state) {
            return Err(RegistryError::IllegalTransition {
                from: entry.state,
                to: new_state,
            });
        }
        entry.state = new_state;
        Ok(())
    }

    /// True iff all prerequisites are `Running` and `id` itself is `Inactive`.
    pub fn is_launchable(&self, id: SubsystemId) -> bool {
        let inner = self.inner.read();
        let Some(entry) = inner.entries.get(id) else {
            return false;
        };
        entry.state == SubsystemState::Inactive
            && entry
                .dependencies
                .iter()
                .all(|&d| inner.entries[d].state == SubsystemState::Running)
    }

    /// True iff no dependent of `id` is in a non-`Inactive` state and `id`
    /// is itself in `Running`.
    pub fn is_landable(&self, id: SubsystemId) -> bool {
        let inner = self.inner.read();
        let Some(entry) = inner.entries.get(id) else {
            return false;
        };
        entry.state == SubsystemState::Running
            && entry
                .dependents
                .iter()
                .all(|&d| inner.entries[d].state == SubsystemState::Inactive)
    }

    pub fn get_by_name(&self, name: &str) -> Option<SubsystemId> {
        self.inner.read().by_name.get(name).copied()
    }

    pub fn lookup_state(&self, id: SubsystemId) -> Option<SubsystemState> {
        self.inner.read().entries.get(id).map(|e| e.state)
    }

    pub fn name_of(&self, id: SubsystemId) -> Option<String> {
        self.inner.read().entries.get(id).map(|e| e.name.clone())
    }

    pub fn dependencies_of(&self, id: SubsystemId) -> Vec<SubsystemId> {
        self.inner
            .read()
            .entries
            .get(id)
            .map(|e| e.dependencies.clone())
            .unwrap_or_default()
    }

    pub fn dependents_of(&self, id: SubsystemId) -> Vec<SubsystemId> {
        self.inner
            .read()
            .entries
            .get(id)
            .map(|e| e.dependents.clone())
            .unwrap_or_default()
    }

    /// All registered subsystem ids, in registration order.
    pub fn all_ids(&self) -> Vec<SubsystemId> {
        (0..self.inner.read().entries.len()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_on_identical_shape() {
        let reg = SubsystemRegistry::new();
        let a1 = reg.register("A", &[]).unwrap();
        let a2 = reg.register("A", &[]).unwrap();
        assert_eq!(a1, a2);
    }

    #[test]
    fn register_rejects_changed_dependency_set() {
        let reg = SubsystemRegistry::new();
        reg.register("Base", &[]).unwrap();
        reg.register("A", &["Base"]).unwrap();
        let err = reg.register("A", &[]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyRegisteredDifferentShape("A".to_string())
        );
    }

    #[test]
    fn register_fails_on_unknown_dependency() {
        let reg = SubsystemRegistry::new();
        let err = reg.register("A", &["Ghost"]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownSubsystem("Ghost".to_string())
        );
    }

    #[test]
    fn add_dependency_detects_cycles() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        let err = reg.add_dependency(a, b).unwrap_err();
        assert_eq!(err, RegistryError::CycleDetected);
    }

    #[test]
    fn is_launchable_requires_all_deps_running() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        assert!(reg.is_launchable(a));
        assert!(!reg.is_launchable(b));

        reg.set_state(a, SubsystemState::Starting).unwrap();
        reg.set_state(a, SubsystemState::Running).unwrap();
        assert!(reg.is_launchable(b));
        assert!(!reg.is_launchable(a)); // a is no longer Inactive
    }

    #[test]
    fn is_landable_requires_dependents_inactive() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        reg.set_state(a, SubsystemState::Starting).unwrap();
        reg.set_state(a, SubsystemState::Running).unwrap();
        reg.set_state(b, SubsystemState::Starting).unwrap();
        reg.set_state(b, SubsystemState::Running).unwrap();

        assert!(!reg.is_landable(a)); // b still running
        assert!(reg.is_landable(b));

        reg.set_state(b, SubsystemState::Stopping).unwrap();
        reg.set_state(b, SubsystemState::Inactive).unwrap();
        assert!(reg.is_landable(a));
    }

    #[test]
    fn illegal_transition_leaves_state_unchanged() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let err = reg.set_state(a, SubsystemState::Running).unwrap_err();
        assert!(matches!(err, RegistryError::IllegalTransition { .. }));
        assert_eq!(reg.lookup_state(a), Some(SubsystemState::Inactive));
    }

    #[test]
    fn unknown_subsystem_queries_return_none() {
        let reg = SubsystemRegistry::new();
        assert_eq!(reg.get_by_name("Nope"), None);
        assert_eq!(reg.lookup_state(999), None);
    }

    proptest::proptest! {
        #[test]
        fn registering_self_dependency_chain_never_admits_cycle(depth in 1usize..8) {
            let reg = SubsystemRegistry::new();
            let mut prev: Option<&str> = None;
            let names: Vec<String> = (0..depth).map(|i| format!("S{i}")).collect();
            for (i, name) in names.iter().enumerate() {
                let deps: Vec<&str> = prev.into_iter().collect();
                reg.register(name, &deps).unwrap();
                prev = Some(names[i].as_str());
            }
            // Adding an edge from the first back to the last must be rejected.
            let first = reg.get_by_name(&names[0]).unwrap();
            let last = reg.get_by_name(&names[depth - 1]).unwrap();
            if depth > 1 {
                assert!(reg.add_dependency(first, last).is_err());
            }
        }
    }
}
