// SPDX-License-Identifier: MIT

use hydrogen_registry::{SubsystemId, SubsystemRegistry};

/// Dependency-first order over every registered subsystem, ties broken by
/// registration order (spec §4.4 "breaking ties by registration order").
pub fn topological_order(registry: &SubsystemRegistry) -> Vec<SubsystemId> {
    let ids = registry.all_ids();
    let mut visited = vec![false; ids.len()];
    let mut order = Vec::with_capacity(ids.len());
    for id in ids {
        visit(id, registry, &mut visited, &mut order);
    }
    order
}

fn visit(id: SubsystemId, registry: &SubsystemRegistry, visited: &mut [bool], order: &mut Vec<SubsystemId>) {
    if visited[id] {
        return;
    }
    visited[id] = true;
    for dep in registry.dependencies_of(id) {
        visit(dep, registry, visited, order);
    }
    order.push(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_precede_dependents() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        let c = reg.register("C", &["B"]).unwrap();
        let order = topological_order(&reg);
        let pos = |id: SubsystemId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(c));
    }

    #[test]
    fn ties_break_by_registration_order() {
        let reg = SubsystemRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        let b = reg.register("B", &["A"]).unwrap();
        let c = reg.register("C", &["A"]).unwrap();
        let order = topological_order(&reg);
        let pos = |id: SubsystemId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(c));
    }
}
