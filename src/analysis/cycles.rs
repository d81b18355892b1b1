//! Dependency cycle detection over a [`PackageGraph`].
//!
//! The depth-first searches follow efferent edges in package-name order.
//! They work on the path they are given: `collect_cycle` leaves the path
//! ending in the repeated package (possibly after a prefix that is not part
//! of the cycle), `collect_all_cycles` keeps every branch that led into a
//! cycle. [`PackageGraph::first_cycle`] trims the raw path down to the cycle.

use crate::analysis::PackageGraph;
use crate::model::Issue;
use std::collections::{BTreeSet, HashMap, VecDeque};

impl PackageGraph {
    /// Whether a cycle is reachable from `name`.
    pub fn contains_cycle(&self, name: &str) -> bool {
        self.collect_cycle(name, &mut Vec::new())
    }

    /// Depth-first search for the first cycle reachable from `name`.
    ///
    /// On `true`, `path` ends with a package that appears earlier in it; on
    /// `false`, `path` is returned to the state it was passed in.
    pub fn collect_cycle(&self, name: &str, path: &mut Vec<String>) -> bool {
        if path.iter().any(|p| p == name) {
            path.push(name.to_string());
            return true;
        }

        path.push(name.to_string());

        if let Some(package) = self.package(name) {
            for efferent in package.efferents().keys() {
                if self.collect_cycle(efferent, path) {
                    return true;
                }
            }
        }

        path.pop();
        false
    }

    /// Like [`collect_cycle`](Self::collect_cycle), but keeps exploring after
    /// a cycle is found, so `path` collects every package on any cycle the
    /// walk reaches. A package is only backtracked out of the path when none
    /// of its efferents led to a cycle.
    pub fn collect_all_cycles(&self, name: &str, path: &mut Vec<String>) -> bool {
        if path.iter().any(|p| p == name) {
            path.push(name.to_string());
            return true;
        }

        path.push(name.to_string());

        let mut found = false;
        if let Some(package) = self.package(name) {
            for efferent in package.efferents().keys() {
                if self.collect_all_cycles(efferent, path) {
                    found = true;
                }
            }
        }

        if found {
            return true;
        }

        path.pop();
        false
    }

    /// The first cycle reachable from `name`, starting and ending with the
    /// same package.
    pub fn first_cycle(&self, name: &str) -> Option<Vec<String>> {
        let mut path = Vec::new();
        if !self.collect_cycle(name, &mut path) {
            return None;
        }
        let repeated = path.last()?;
        let start = path.iter().position(|p| p == repeated)?;
        Some(path.split_off(start))
    }

    /// Shortest cycle through `name` that stays inside `members`.
    fn shortest_cycle_within(&self, name: &str, members: &BTreeSet<&str>) -> Option<Vec<String>> {
        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut queue = VecDeque::from([name]);

        while let Some(current) = queue.pop_front() {
            let Some(package) = self.package(current) else {
                continue;
            };
            for next in package.efferents().keys() {
                let next = next.as_str();
                if !members.contains(next) {
                    continue;
                }
                if next == name {
                    let mut cycle = vec![name.to_string()];
                    let mut step = current;
                    while step != name {
                        cycle.push(step.to_string());
                        step = *previous.get(step)?;
                    }
                    cycle.push(name.to_string());
                    cycle.reverse();
                    return Some(cycle);
                }
                if !previous.contains_key(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

pub fn detect_circular_dependencies(graph: &PackageGraph) -> Vec<Issue> {
    let mut issues = Vec::new();

    for component in graph.cyclic_components() {
        let members: BTreeSet<&str> = component.iter().map(String::as_str).collect();
        let Some(start) = component.first() else {
            continue;
        };
        if let Some(cycle) = graph.shortest_cycle_within(start, &members) {
            issues.push(Issue::circular_dependency(
                graph.role(),
                component.clone(),
                &cycle,
            ));
        }
    }

    issues
}
