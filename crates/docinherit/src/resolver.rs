//! Hierarchy resolver: the order in which documented types are merged.

use std::collections::{HashMap, HashSet};

use log::{debug, error};
use petgraph::{algo::tarjan_scc, graph::DiGraph};

use docinherit_core::identifier::Id;

use crate::{error::DocInheritError, registry::TypeRegistry};

/// Order `types` so that every type follows the entries of its ancestor
/// chain that are part of `types`.
///
/// Each pass scans the unordered types from the last to the first and
/// places every type whose dependencies are already placed.
///
/// # Errors
///
/// Returns [`DocInheritError::CyclicHierarchy`] when a pass places nothing.
pub fn sort(registry: &TypeRegistry, types: &[Id]) -> Result<Vec<Id>, DocInheritError> {
    let working: HashSet<Id> = types.iter().copied().collect();
    let dependencies: HashMap<Id, Vec<Id>> = types
        .iter()
        .map(|&type_name| {
            let chain = registry
                .lookup(type_name)
                .map(|descriptor| registry.ancestor_chain(descriptor))
                .unwrap_or_default();
            let chain = chain.into_iter().filter(|dep| working.contains(dep)).collect();
            (type_name, chain)
        })
        .collect();

    let mut remaining = types.to_vec();
    let mut ordered = Vec::with_capacity(types.len());
    let mut placed = HashSet::new();

    while !remaining.is_empty() {
        let mut progressed = false;
        for index in (0..remaining.len()).rev() {
            let type_name = remaining[index];
            let ready = dependencies
                .get(&type_name)
                .is_none_or(|deps| deps.iter().all(|dep| placed.contains(dep)));
            if ready {
                remaining.remove(index);
                placed.insert(type_name);
                ordered.push(type_name);
                progressed = true;
            }
        }

        if !progressed {
            let cycles = find_cycles(&remaining, &dependencies);
            error!(types = remaining.len(); "Type hierarchy contains a cycle");
            return Err(DocInheritError::CyclicHierarchy { cycles });
        }
    }

    debug!(types = ordered.len(); "Resolved processing order");
    Ok(ordered)
}

/// The strongly connected components of the unplaced types that form a
/// cycle, each in input order.
fn find_cycles(remaining: &[Id], dependencies: &HashMap<Id, Vec<Id>>) -> Vec<Vec<Id>> {
    let mut graph = DiGraph::<Id, ()>::new();
    let nodes: HashMap<Id, _> = remaining
        .iter()
        .map(|&type_name| (type_name, graph.add_node(type_name)))
        .collect();

    for (type_name, node) in &nodes {
        for dep in dependencies.get(type_name).into_iter().flatten() {
            if let Some(&target) = nodes.get(dep) {
                graph.add_edge(*node, target, ());
            }
        }
    }

    let position = |type_name: &Id| remaining.iter().position(|t| t == type_name);
    let mut cycles: Vec<Vec<Id>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1 || graph.contains_edge(component[0], component[0]))
        .map(|component| {
            let mut cycle: Vec<Id> = component.into_iter().map(|node| graph[node]).collect();
            cycle.sort_by_key(position);
            cycle
        })
        .collect();
    cycles.sort_by_key(|cycle| cycle.first().and_then(position));

    if cycles.is_empty() {
        cycles.push(remaining.to_vec());
    }
    cycles
}

#[cfg(test)]
mod tests {
    use docinherit_core::descriptor::TypeDescriptor;

    use super::*;
    use crate::registry::Module;

    fn ids(names: &[&str]) -> Vec<Id> {
        names.iter().map(|name| Id::new(name)).collect()
    }

    fn registry_of(module: Module) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(&module);
        registry
    }

    #[test]
    fn test_ancestors_come_first() {
        let registry = registry_of(
            Module::new("Acme")
                .with_type(TypeDescriptor::new("Acme.ClassAB").with_base("Acme.ClassA"))
                .with_type(TypeDescriptor::new("Acme.ClassA").with_interface("Acme.IA"))
                .with_type(TypeDescriptor::new("Acme.IA")),
        );

        let order = sort(&registry, &ids(&["Acme.ClassAB", "Acme.ClassA", "Acme.IA"])).unwrap();

        assert_eq!(order, ids(&["Acme.IA", "Acme.ClassA", "Acme.ClassAB"]));
    }

    #[test]
    fn test_independent_types_scan_from_end() {
        let registry = registry_of(
            Module::new("Acme")
                .with_type(TypeDescriptor::new("Acme.A"))
                .with_type(TypeDescriptor::new("Acme.B"))
                .with_type(TypeDescriptor::new("Acme.C")),
        );

        let order = sort(&registry, &ids(&["Acme.A", "Acme.B", "Acme.C"])).unwrap();

        assert_eq!(order, ids(&["Acme.C", "Acme.B", "Acme.A"]));
    }

    #[test]
    fn test_types_outside_working_set_are_ignored() {
        let registry = registry_of(
            Module::new("Acme")
                .with_type(TypeDescriptor::new("Acme.Base"))
                .with_type(TypeDescriptor::new("Acme.Derived").with_base("Acme.Base")),
        );

        let order = sort(&registry, &ids(&["Acme.Derived"])).unwrap();

        assert_eq!(order, ids(&["Acme.Derived"]));
    }

    #[test]
    fn test_self_cycle_is_fatal() {
        let registry = registry_of(
            Module::new("Acme")
                .with_type(TypeDescriptor::new("Acme.Loop").with_base("Acme.Loop"))
                .with_type(TypeDescriptor::new("Acme.Fine")),
        );

        let err = sort(&registry, &ids(&["Acme.Loop", "Acme.Fine"])).unwrap_err();

        match err {
            DocInheritError::CyclicHierarchy { cycles } => assert_eq!(cycles, vec![ids(&["Acme.Loop"])]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transitive_cycle_reports_members() {
        let registry = registry_of(
            Module::new("Acme")
                .with_type(TypeDescriptor::new("Acme.A").with_base("Acme.B"))
                .with_type(TypeDescriptor::new("Acme.B").with_base("Acme.C"))
                .with_type(TypeDescriptor::new("Acme.C").with_base("Acme.B")),
        );

        let err = sort(&registry, &ids(&["Acme.A", "Acme.B", "Acme.C"])).unwrap_err();

        assert_eq!(err.to_string(), "cyclic type hierarchy: Acme.B -> Acme.C");
    }
}
