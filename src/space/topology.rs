// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Evaluation order of dependent parameters and dependency closures.
//!
//! Dependents form a graph whose edges run from each argument that is itself
//! a dependent to the dependents reading it. Kahn's algorithm gives an
//! evaluation order; ready nodes are taken in declaration order so the
//! result is deterministic.

use crate::error::{sorted_names, Result, SpaceError};
use crate::function::Function;
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// Order dependents so that every dependent follows all of its arguments.
///
/// `roots` are the names that need no evaluation (independents and
/// constants). Fails with `UndefinedParameter` naming every dependent that
/// reads an undeclared name, and with `CyclicParameters` naming every
/// dependent left unscheduled by a cycle.
pub(crate) fn sort_dependents(
    roots: &IndexSet<&str>,
    dependents: &IndexMap<String, Function>,
) -> Result<Vec<String>> {
    let undefined: Vec<&str> = dependents
        .iter()
        .filter(|(_, f)| {
            f.arguments()
                .iter()
                .any(|arg| !roots.contains(arg.as_str()) && !dependents.contains_key(arg))
        })
        .map(|(name, _)| name.as_str())
        .collect();
    if !undefined.is_empty() {
        return Err(SpaceError::UndefinedParameter {
            names: sorted_names(undefined),
        });
    }

    let mut in_degree: IndexMap<&str, usize> = IndexMap::new();
    let mut readers: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (name, function) in dependents {
        let mut degree = 0;
        for arg in function.arguments() {
            if dependents.contains_key(arg) {
                degree += 1;
                readers.entry(arg.as_str()).or_default().push(name.as_str());
            }
        }
        in_degree.insert(name.as_str(), degree);
    }

    let mut ready: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&name, _)| name)
        .collect();
    let mut sorted = Vec::with_capacity(dependents.len());

    while let Some(name) = ready.pop_front() {
        sorted.push(name.to_string());
        for &reader in readers.get(name).map(Vec::as_slice).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(reader) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(reader);
                }
            }
        }
    }

    if sorted.len() != dependents.len() {
        let stuck = in_degree
            .iter()
            .filter(|(_, &degree)| degree > 0)
            .map(|(&name, _)| name);
        return Err(SpaceError::CyclicParameters {
            names: sorted_names(stuck),
        });
    }
    Ok(sorted)
}

/// The independent (or constant) parameters each parameter depends on.
///
/// Roots depend on themselves; a dependent depends on the union of its
/// arguments' closures. `sorted` must be the output of [`sort_dependents`].
pub(crate) fn dependency_closures(
    roots: &IndexSet<&str>,
    dependents: &IndexMap<String, Function>,
    sorted: &[String],
) -> IndexMap<String, IndexSet<String>> {
    let mut closures: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for &root in roots {
        closures.insert(root.to_string(), IndexSet::from([root.to_string()]));
    }
    for name in sorted {
        let mut closure = IndexSet::new();
        if let Some(function) = dependents.get(name) {
            for arg in function.arguments() {
                if let Some(parent) = closures.get(arg) {
                    closure.extend(parent.iter().cloned());
                }
            }
        }
        closures.insert(name.clone(), closure);
    }
    closures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependents(specs: &[(&str, &[&str])]) -> IndexMap<String, Function> {
        specs
            .iter()
            .map(|(name, args)| (name.to_string(), Function::new(args.iter().copied(), |_| 0)))
            .collect()
    }

    #[test]
    fn test_sorts_chain_declared_backwards() {
        let roots = IndexSet::from(["a", "b"]);
        let deps = dependents(&[("z", &["y", "b"]), ("y", &["x"]), ("x", &["a"])]);
        let sorted = sort_dependents(&roots, &deps).unwrap();
        assert_eq!(sorted, vec!["x", "y", "z"]);

        let closures = dependency_closures(&roots, &deps, &sorted);
        let z: Vec<&str> = closures["z"].iter().map(String::as_str).collect();
        assert_eq!(z, vec!["a", "b"]);
        assert_eq!(closures["a"].len(), 1);
    }

    #[test]
    fn test_ready_nodes_keep_declaration_order() {
        let roots = IndexSet::from(["a"]);
        let deps = dependents(&[("q", &["a"]), ("p", &["a"]), ("r", &["p", "q"])]);
        assert_eq!(sort_dependents(&roots, &deps).unwrap(), vec!["q", "p", "r"]);
    }

    #[test]
    fn test_undefined_argument() {
        let roots = IndexSet::from(["a"]);
        let deps = dependents(&[("c", &["a", "nope"]), ("d", &["c"])]);
        match sort_dependents(&roots, &deps) {
            Err(SpaceError::UndefinedParameter { names }) => assert_eq!(names, vec!["c"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_cycle_reports_stuck_dependents() {
        let roots = IndexSet::from(["a"]);
        let deps = dependents(&[
            ("ok", &["a"]),
            ("p", &["q"]),
            ("q", &["p"]),
            ("tail", &["q", "ok"]),
        ]);
        match sort_dependents(&roots, &deps) {
            Err(SpaceError::CyclicParameters { names }) => {
                assert_eq!(names, vec!["p", "q", "tail"])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let roots = IndexSet::new();
        let deps = dependents(&[("s", &["s"])]);
        assert!(matches!(
            sort_dependents(&roots, &deps),
            Err(SpaceError::CyclicParameters { .. })
        ));
    }

    #[test]
    fn test_constant_only_dependent_has_constant_closure() {
        let roots = IndexSet::from(["k"]);
        let deps = dependents(&[("d", &["k"]), ("e", &[])]);
        let sorted = sort_dependents(&roots, &deps).unwrap();
        let closures = dependency_closures(&roots, &deps, &sorted);
        assert!(closures["d"].contains("k"));
        assert!(closures["e"].is_empty());
    }
}
