use crate::model::Class;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Whether a node groups classes by declared package or by assigned module.
///
/// Both roles behave identically; the role only matters to reporting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PackageRole {
    #[default]
    Package,
    Module,
}

/// A named grouping of classes together with its weighted dependency edges.
///
/// Edges are keyed by the name of the package on the other end, so a set of
/// packages that depend on each other never forms an ownership cycle.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    role: PackageRole,
    volatility: u32,
    classes: BTreeMap<String, Arc<Class>>,
    afferents: BTreeMap<String, usize>,
    efferents: BTreeMap<String, usize>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_role(name, PackageRole::Package)
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self::with_role(name, PackageRole::Module)
    }

    pub fn with_role(name: impl Into<String>, role: PackageRole) -> Self {
        Self {
            name: name.into(),
            role,
            volatility: 1,
            classes: BTreeMap::new(),
            afferents: BTreeMap::new(),
            efferents: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> PackageRole {
        self.role
    }

    pub fn volatility(&self) -> u32 {
        self.volatility
    }

    /// A volatility of 0 removes the package from distance-based reporting.
    pub fn set_volatility(&mut self, volatility: u32) {
        self.volatility = volatility;
    }

    pub fn add_class(&mut self, class: Arc<Class>) {
        self.classes.insert(class.name().to_string(), class);
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn abstract_class_count(&self) -> usize {
        self.classes.values().filter(|c| c.is_abstract()).count()
    }

    pub fn concrete_class_count(&self) -> usize {
        self.class_count() - self.abstract_class_count()
    }

    /// Record that this package depends on `target` with weight `count`.
    ///
    /// Updates both ends of the edge. Self-edges are ignored.
    pub fn depends_upon(&mut self, target: &mut Package, count: usize) {
        let source = self.name.clone();
        self.add_efferent(target.name(), count);
        target.add_afferent(&source, count);
    }

    pub(crate) fn add_afferent(&mut self, package: &str, count: usize) {
        if package != self.name {
            *self.afferents.entry(package.to_string()).or_insert(0) += count;
        }
    }

    pub(crate) fn add_efferent(&mut self, package: &str, count: usize) {
        if package != self.name {
            *self.efferents.entry(package.to_string()).or_insert(0) += count;
        }
    }

    /// Packages that depend on this one, with accumulated weights.
    pub fn afferents(&self) -> &BTreeMap<String, usize> {
        &self.afferents
    }

    /// Packages this one depends on, with accumulated weights.
    pub fn efferents(&self) -> &BTreeMap<String, usize> {
        &self.efferents
    }

    pub fn afferent_count(&self, package: &str) -> Option<usize> {
        self.afferents.get(package).copied()
    }

    pub fn efferent_count(&self, package: &str) -> Option<usize> {
        self.efferents.get(package).copied()
    }

    /// Afferent coupling (Ca): sum of incoming edge weights.
    pub fn afferent_coupling(&self) -> usize {
        self.afferents.values().sum()
    }

    /// Efferent coupling (Ce): sum of outgoing edge weights.
    pub fn efferent_coupling(&self) -> usize {
        self.efferents.values().sum()
    }

    /// Ce / (Ce + Ca), or 0 for a package with no coupling at all.
    pub fn instability(&self) -> f64 {
        let efferent = self.efferent_coupling() as f64;
        let total = efferent + self.afferent_coupling() as f64;
        if total > 0.0 { efferent / total } else { 0.0 }
    }

    /// Abstract classes over all classes, or 0 for an empty package.
    pub fn abstractness(&self) -> f64 {
        let count = self.class_count();
        if count > 0 {
            self.abstract_class_count() as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Distance from the main sequence, scaled by volatility.
    pub fn distance(&self) -> f64 {
        (self.abstractness() + self.instability() - 1.0).abs() * self.volatility as f64
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Package {}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
