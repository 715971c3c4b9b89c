//! Transitive dependency closure over the package graph.
//!
//! The closure of the keep list is the set of packages that must never show
//! up as upgrade candidates: the kept packages themselves plus everything
//! reachable from them via direct-dependency edges.

use std::collections::{HashMap, HashSet};

/// Source of direct-dependency edges, keyed by package name.
pub trait DepLookup {
    /// Direct dependency names for `name`, or `None` when the package is not
    /// present in the local database.
    fn direct_deps(&self, name: &str) -> Option<&[String]>;
}

impl DepLookup for HashMap<String, Vec<String>> {
    fn direct_deps(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(Vec::as_slice)
    }
}

/// Result of a closure walk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Closure {
    /// Every name found in the database and reachable from the roots.
    pub members: HashSet<String>,
    /// Names that were reached but not present in the database, in the order
    /// they were first encountered. Roots land here too; hitting one is not
    /// fatal and does not stop traversal of the remaining roots.
    pub unfound: Vec<String>,
}

impl Closure {
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }
}

/// Walk the dependency graph from `roots`, visiting each node at most once.
///
/// An explicit worklist replaces recursion so deep graphs cannot overflow the
/// stack, and a single visited set shared across all roots guarantees
/// termination on cycles (self-dependencies included). For a fixed input
/// order the resulting set and unfound list are deterministic.
pub fn compute_closure(roots: &[String], lookup: &impl DepLookup) -> Closure {
    let mut closure = Closure::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = Vec::new();

    for root in roots {
        stack.push(root.clone());
        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            match lookup.direct_deps(&name) {
                Some(deps) => {
                    // Reverse keeps the pop order equal to dependency order.
                    for dep in deps.iter().rev() {
                        if !visited.contains(dep) {
                            stack.push(dep.clone());
                        }
                    }
                    closure.members.insert(name);
                }
                None => closure.unfound.push(name),
            }
        }
    }

    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        edges
            .iter()
            .map(|(name, deps)| {
                (
                    (*name).to_string(),
                    deps.iter().map(|d| (*d).to_string()).collect(),
                )
            })
            .collect()
    }

    fn roots(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn mutual_cycle_terminates_and_covers_both() {
        // Scenario: A depends on B, B depends on A.
        let g = graph(&[("A", &["B"]), ("B", &["A"])]);
        let c = compute_closure(&roots(&["A"]), &g);
        assert_eq!(
            c.members,
            HashSet::from([String::from("A"), String::from("B")])
        );
        assert!(c.unfound.is_empty());
    }

    #[test]
    fn self_dependency_terminates() {
        let g = graph(&[("loop", &["loop"])]);
        let c = compute_closure(&roots(&["loop"]), &g);
        assert_eq!(c.members, HashSet::from([String::from("loop")]));
    }

    #[test]
    fn missing_root_is_unfound_and_others_still_walked() {
        let g = graph(&[("a", &["b"]), ("b", &[])]);
        let c = compute_closure(&roots(&["ghost", "a"]), &g);
        assert_eq!(c.unfound, vec![String::from("ghost")]);
        assert!(c.contains("a"));
        assert!(c.contains("b"));
        assert!(!c.contains("ghost"));
    }

    #[test]
    fn missing_dependency_is_recorded_not_traversed() {
        let g = graph(&[("a", &["virtual-thing"])]);
        let c = compute_closure(&roots(&["a"]), &g);
        assert_eq!(c.members, HashSet::from([String::from("a")]));
        assert_eq!(c.unfound, vec![String::from("virtual-thing")]);
    }

    #[test]
    fn closure_is_closed_over_found_nodes() {
        let g = graph(&[
            ("top", &["mid1", "mid2"]),
            ("mid1", &["leaf"]),
            ("mid2", &["leaf"]),
            ("leaf", &[]),
            ("unrelated", &[]),
        ]);
        let c = compute_closure(&roots(&["top"]), &g);
        for name in &c.members {
            for dep in g.direct_deps(name).unwrap() {
                assert!(c.contains(dep), "{name} -> {dep} escaped the closure");
            }
        }
        assert!(!c.contains("unrelated"));
    }

    /// Lookup wrapper that counts queries per name.
    struct Counting<'a> {
        inner: &'a HashMap<String, Vec<String>>,
        hits: RefCell<HashMap<String, usize>>,
    }

    impl DepLookup for Counting<'_> {
        fn direct_deps(&self, name: &str) -> Option<&[String]> {
            *self
                .hits
                .borrow_mut()
                .entry(name.to_string())
                .or_insert(0) += 1;
            self.inner.direct_deps(name)
        }
    }

    #[test]
    fn each_node_is_looked_up_at_most_once() {
        // Diamond plus a cycle back to the top.
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &["a"]),
        ]);
        let counting = Counting {
            inner: &g,
            hits: RefCell::new(HashMap::new()),
        };
        let c = compute_closure(&roots(&["a", "b"]), &counting);
        assert_eq!(c.members.len(), 4);
        for (name, count) in counting.hits.borrow().iter() {
            assert_eq!(*count, 1, "{name} looked up {count} times");
        }
    }

    #[test]
    fn result_is_deterministic_for_fixed_input() {
        let g = graph(&[
            ("x", &["ghost1", "y"]),
            ("y", &["z", "ghost2"]),
            ("z", &[]),
        ]);
        let first = compute_closure(&roots(&["x"]), &g);
        let second = compute_closure(&roots(&["x"]), &g);
        assert_eq!(first, second);
        assert_eq!(
            first.unfound,
            vec![String::from("ghost1"), String::from("ghost2")]
        );
    }
}
