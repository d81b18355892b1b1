use crate::analysis::PackageGraph;
use crate::config::Config;
use crate::model::{Issue, Package, PackageRole};
use serde::Serialize;
use std::collections::BTreeSet;

/// Point-in-time metrics for one package or module, as shown in reports.
#[derive(Debug, Clone, Serialize)]
pub struct PackageMetrics {
    pub name: String,
    pub role: PackageRole,
    pub class_count: usize,
    pub abstract_class_count: usize,
    pub concrete_class_count: usize,
    pub afferent_coupling: usize,
    pub efferent_coupling: usize,
    pub abstractness: f64,
    pub instability: f64,
    pub distance: f64,
    pub volatility: u32,
    pub has_cycle: bool,
}

impl PackageMetrics {
    pub fn compute(package: &Package, has_cycle: bool) -> Self {
        Self {
            name: package.name().to_string(),
            role: package.role(),
            class_count: package.class_count(),
            abstract_class_count: package.abstract_class_count(),
            concrete_class_count: package.concrete_class_count(),
            afferent_coupling: package.afferent_coupling(),
            efferent_coupling: package.efferent_coupling(),
            abstractness: package.abstractness(),
            instability: package.instability(),
            distance: package.distance(),
            volatility: package.volatility(),
            has_cycle,
        }
    }
}

/// Metrics for every node of `graph`, in name order.
pub fn collect_metrics(graph: &PackageGraph) -> Vec<PackageMetrics> {
    let cyclic: BTreeSet<String> = graph.packages_reaching_cycles();
    graph
        .packages()
        .map(|p| PackageMetrics::compute(p, cyclic.contains(p.name())))
        .collect()
}

/// Packages that own classes and sit further from the main sequence than
/// the configured threshold.
pub fn detect_distance_violations(graph: &PackageGraph, config: &Config) -> Vec<Issue> {
    let threshold = config.thresholds.max_distance;

    graph
        .packages()
        .filter(|p| p.class_count() > 0 && p.distance() > threshold)
        .map(|p| {
            Issue::main_sequence_distance(
                p.name().to_string(),
                p.distance(),
                p.abstractness(),
                p.instability(),
            )
        })
        .collect()
}
