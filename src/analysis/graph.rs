use crate::model::{Class, ClassDataset, Package, PackageRole, package_of};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

/// Excludes packages by name prefix.
///
/// A prefix ending in `.` or `*` matches by plain string prefix; any other
/// prefix matches the package itself and its subpackages.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    ignored: Vec<String>,
}

impl PackageFilter {
    pub fn new(ignored: Vec<String>) -> Self {
        Self { ignored }
    }

    pub fn accepts(&self, package: &str) -> bool {
        !self
            .ignored
            .iter()
            .any(|prefix| package_matches(package, prefix))
    }
}

pub(crate) fn package_matches(package: &str, prefix: &str) -> bool {
    let trimmed = prefix.trim_end_matches('*');
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.ends_with('.') || trimmed.len() != prefix.len() {
        return package.starts_with(trimmed);
    }
    package == trimmed
        || package
            .strip_prefix(trimmed)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Name-keyed arena of packages (or modules) and their weighted edges.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    role: PackageRole,
    packages: BTreeMap<String, Package>,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(role: PackageRole) -> Self {
        Self {
            role,
            packages: BTreeMap::new(),
        }
    }

    /// Build the package graph: one node per declared or referenced package,
    /// edges weighted by per-class dependency counts.
    pub fn build(dataset: &ClassDataset, filter: &PackageFilter) -> Self {
        let mut graph = Self::new();

        for class in dataset.classes() {
            if !filter.accepts(class.package()) {
                continue;
            }
            graph.add_class(Arc::clone(class));

            // Imports named after a dependency are placed by resolving that
            // dependency below, which may land in a different package.
            let resolved: BTreeSet<&str> =
                class.dependencies().keys().map(|d| package_of(d)).collect();
            for package in class.imported_packages() {
                if !resolved.contains(package) && filter.accepts(package) {
                    graph.get_or_create(package);
                }
            }

            for (dependency, count) in class.dependencies() {
                let target = dataset
                    .class(dependency)
                    .map(|c| c.package())
                    .unwrap_or_else(|| package_of(dependency));
                if !filter.accepts(target) {
                    continue;
                }
                graph.get_or_create(target);
                graph.depends_upon(class.package(), target, *count);
            }
        }

        graph
    }

    /// Build the module graph from the dataset's class → module side table.
    /// Unclassified classes and dependencies on them are left out.
    pub fn build_modules(dataset: &ClassDataset) -> Self {
        let mut graph = Self::with_role(PackageRole::Module);

        for class in dataset.classes() {
            let Some(module) = dataset.module_of(class.name()) else {
                continue;
            };
            graph.get_or_create(module).add_class(Arc::clone(class));

            for (dependency, count) in class.dependencies() {
                if let Some(target) = dataset.module_of(dependency) {
                    graph.get_or_create(target);
                    graph.depends_upon(module, target, *count);
                }
            }
        }

        graph
    }

    pub fn role(&self) -> PackageRole {
        self.role
    }

    pub fn get_or_create(&mut self, name: &str) -> &mut Package {
        let role = self.role;
        self.packages
            .entry(name.to_string())
            .or_insert_with(|| Package::with_role(name, role))
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn add_class(&mut self, class: Arc<Class>) {
        let package = class.package().to_string();
        self.get_or_create(&package).add_class(class);
    }

    /// `from` depends on `to` with weight `count`; both ends are updated.
    /// Self-edges are ignored.
    pub fn depends_upon(&mut self, from: &str, to: &str, count: usize) {
        if from == to {
            return;
        }
        self.get_or_create(from).add_efferent(to, count);
        self.get_or_create(to).add_afferent(from, count);
    }

    /// Returns false when no such package exists.
    pub fn set_volatility(&mut self, name: &str, volatility: u32) -> bool {
        match self.packages.get_mut(name) {
            Some(package) => {
                package.set_volatility(volatility);
                true
            }
            None => false,
        }
    }

    /// Export as a petgraph graph with edge weights.
    pub fn to_digraph(&self) -> DiGraph<String, usize> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for name in self.packages.keys() {
            indices.insert(name.as_str(), graph.add_node(name.clone()));
        }

        for package in self.packages.values() {
            let Some(&from) = indices.get(package.name()) else {
                continue;
            };
            for (target, weight) in package.efferents() {
                if let Some(&to) = indices.get(target.as_str()) {
                    graph.add_edge(from, to, *weight);
                }
            }
        }

        graph
    }

    /// Strongly connected components with more than one package, each sorted
    /// by name.
    pub fn cyclic_components(&self) -> Vec<Vec<String>> {
        let graph = self.to_digraph();
        let mut components: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<String> = scc.iter().map(|idx| graph[*idx].clone()).collect();
                names.sort();
                names
            })
            .collect();
        components.sort();
        components
    }

    /// Packages from which at least one cycle is reachable.
    pub fn packages_reaching_cycles(&self) -> BTreeSet<String> {
        let mut reached: BTreeSet<String> = self.cyclic_components().into_iter().flatten().collect();
        let mut queue: VecDeque<String> = reached.iter().cloned().collect();

        while let Some(name) = queue.pop_front() {
            if let Some(package) = self.packages.get(&name) {
                for dependent in package.afferents().keys() {
                    if reached.insert(dependent.clone()) {
                        queue.push_back(dependent.clone());
                    }
                }
            }
        }

        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, deps: &[&str]) -> Class {
        let mut class = Class::new(name);
        class.set_package(package_of(name));
        for dep in deps {
            class.add_dependency(dep);
            class.add_imported_package(package_of(dep));
        }
        class
    }

    #[test]
    fn test_build_accumulates_dependency_counts() {
        let mut dataset = ClassDataset::new();
        let mut widget = class("app.Widget", &["core.Model", "core.Model", "core.Store"]);
        widget.add_dependency("app.Helper");
        dataset.add_class(widget);
        dataset.add_class(class("app.Helper", &["core.Model"]));
        dataset.add_class(class("core.Model", &[]));
        dataset.add_class(class("core.Store", &["java.util.List"]));

        let graph = PackageGraph::build(&dataset, &PackageFilter::default());

        let app = graph.package("app").unwrap();
        let core = graph.package("core").unwrap();
        assert_eq!(app.class_count(), 2);
        assert_eq!(app.efferent_count("core"), Some(4));
        assert_eq!(core.afferent_count("app"), Some(4));
        assert!(app.efferents().get("app").is_none());

        // Referenced-only packages still become nodes.
        let java_util = graph.package("java.util").unwrap();
        assert_eq!(java_util.class_count(), 0);
        assert_eq!(java_util.afferent_coupling(), 1);
    }

    #[test]
    fn test_dependency_on_known_class_uses_declared_package() {
        let mut dataset = ClassDataset::new();
        let mut odd = Class::new("legacy.Odd");
        odd.set_package("relocated");
        dataset.add_class(odd);
        dataset.add_class(class("app.Main", &["legacy.Odd"]));

        let graph = PackageGraph::build(&dataset, &PackageFilter::default());
        assert_eq!(
            graph.package("app").unwrap().efferent_count("relocated"),
            Some(1)
        );
        assert!(graph.package("legacy").is_none());
    }

    #[test]
    fn test_import_without_dependency_still_adds_package() {
        let mut dataset = ClassDataset::new();
        let mut main = class("app.Main", &["core.Model"]);
        main.add_imported_package("annotations");
        dataset.add_class(main);

        let graph = PackageGraph::build(&dataset, &PackageFilter::default());
        let annotations = graph.package("annotations").unwrap();
        assert_eq!(annotations.afferent_coupling(), 0);
        assert_eq!(graph.package("app").unwrap().efferent_coupling(), 1);
    }

    #[test]
    fn test_filter_excludes_packages() {
        let mut dataset = ClassDataset::new();
        dataset.add_class(class("app.Main", &["java.util.List", "javax.inject.Inject", "core.Model"]));
        dataset.add_class(class("java.lang.Shadow", &[]));

        let filter = PackageFilter::new(vec!["java.".to_string(), "javax".to_string()]);
        let graph = PackageGraph::build(&dataset, &filter);

        let names: Vec<_> = graph.packages().map(|p| p.name()).collect();
        assert_eq!(names, vec!["app", "core"]);
        assert_eq!(graph.package("app").unwrap().efferent_coupling(), 1);
    }

    #[test]
    fn test_package_matches() {
        assert!(package_matches("java.util", "java."));
        assert!(package_matches("java.util", "java.*"));
        assert!(package_matches("javax", "javax"));
        assert!(package_matches("javax.inject", "javax"));
        assert!(!package_matches("javaxyz", "javax"));
        assert!(package_matches("anything", "*"));
    }

    #[test]
    fn test_graph_depends_upon_rejects_self_edges() {
        let mut graph = PackageGraph::new();
        graph.depends_upon("a", "a", 3);
        assert!(graph.is_empty());

        graph.depends_upon("a", "b", 3);
        graph.depends_upon("a", "b", 2);
        assert_eq!(graph.package("a").unwrap().efferent_coupling(), 5);
        assert_eq!(graph.package("b").unwrap().afferent_coupling(), 5);
    }

    #[test]
    fn test_module_graph() {
        let mut dataset = ClassDataset::new();
        dataset.add_class(class("app.Main", &["core.Model", "core.Model", "ext.Lib"]));
        dataset.add_class(class("core.Model", &[]));
        dataset.add_class(class("ext.Lib", &[]));
        dataset.put_class_module("app.Main", "application");
        dataset.put_class_module("core.Model", "domain");

        let modules = PackageGraph::build_modules(&dataset);
        assert_eq!(modules.role(), PackageRole::Module);
        assert_eq!(modules.len(), 2);

        let application = modules.package("application").unwrap();
        assert_eq!(application.role(), PackageRole::Module);
        assert_eq!(application.efferent_count("domain"), Some(2));
        assert_eq!(application.efferent_coupling(), 2);
    }

    #[test]
    fn test_cyclic_components_and_reach() {
        let mut graph = PackageGraph::new();
        graph.depends_upon("p1", "p2", 1);
        graph.depends_upon("p2", "p3", 1);
        graph.depends_upon("p3", "p1", 1);
        graph.depends_upon("entry", "p1", 1);
        graph.depends_upon("p3", "leaf", 1);
        graph.get_or_create("p4");

        assert_eq!(
            graph.cyclic_components(),
            vec![vec!["p1".to_string(), "p2".to_string(), "p3".to_string()]]
        );

        let reaching = graph.packages_reaching_cycles();
        assert!(reaching.contains("entry"));
        assert!(reaching.contains("p2"));
        assert!(!reaching.contains("leaf"));
        assert!(!reaching.contains("p4"));
    }

    #[test]
    fn test_set_volatility() {
        let mut graph = PackageGraph::new();
        graph.get_or_create("vendor");
        assert!(graph.set_volatility("vendor", 0));
        assert!(!graph.set_volatility("missing", 0));
        assert_eq!(graph.package("vendor").unwrap().volatility(), 0);
    }
}
