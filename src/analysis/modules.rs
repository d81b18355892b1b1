use crate::analysis::graph::package_matches;
use crate::model::ClassDataset;
use std::collections::BTreeMap;

/// Assigns classes to modules by package prefix. The longest matching
/// prefix wins; classes matching no prefix stay unclassified.
#[derive(Debug, Clone, Default)]
pub struct ModuleClassifier {
    rules: Vec<(String, String)>,
}

impl ModuleClassifier {
    /// `modules` maps each module label to the package prefixes it owns.
    pub fn new(modules: &BTreeMap<String, Vec<String>>) -> Self {
        let mut rules: Vec<(String, String)> = modules
            .iter()
            .flat_map(|(label, prefixes)| {
                prefixes
                    .iter()
                    .map(move |prefix| (prefix.clone(), label.clone()))
            })
            .collect();
        rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn module_for(&self, package: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(prefix, _)| package_matches(package, prefix))
            .map(|(_, label)| label.as_str())
    }

    /// Record a module label for every matching class in `dataset`.
    /// Returns how many classes were classified.
    pub fn classify(&self, dataset: &mut ClassDataset) -> usize {
        let assignments: Vec<(String, String)> = dataset
            .classes()
            .filter_map(|class| {
                self.module_for(class.package())
                    .map(|label| (class.name().to_string(), label.to_string()))
            })
            .collect();

        let count = assignments.len();
        for (class_name, label) in assignments {
            dataset.put_class_module(&class_name, label);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Class;

    fn rules() -> BTreeMap<String, Vec<String>> {
        BTreeMap::from([
            ("core".to_string(), vec!["com.acme".to_string()]),
            (
                "persistence".to_string(),
                vec!["com.acme.db".to_string(), "org.hibernate.".to_string()],
            ),
        ])
    }

    #[test]
    fn test_longest_prefix_wins() {
        let classifier = ModuleClassifier::new(&rules());
        assert_eq!(classifier.module_for("com.acme"), Some("core"));
        assert_eq!(classifier.module_for("com.acme.web"), Some("core"));
        assert_eq!(classifier.module_for("com.acme.db.jdbc"), Some("persistence"));
        assert_eq!(classifier.module_for("org.hibernate.orm"), Some("persistence"));
        assert_eq!(classifier.module_for("com.acmex"), None);
    }

    #[test]
    fn test_classify_fills_side_table() {
        let mut dataset = ClassDataset::new();
        for (name, package) in [
            ("com.acme.db.Repo", "com.acme.db"),
            ("com.acme.App", "com.acme"),
            ("org.other.Thing", "org.other"),
        ] {
            let mut class = Class::new(name);
            class.set_package(package);
            dataset.add_class(class);
        }

        let classified = ModuleClassifier::new(&rules()).classify(&mut dataset);
        assert_eq!(classified, 2);
        assert_eq!(dataset.module_of("com.acme.db.Repo"), Some("persistence"));
        assert_eq!(dataset.module_of("com.acme.App"), Some("core"));
        assert_eq!(dataset.module_of("org.other.Thing"), None);
    }
}
