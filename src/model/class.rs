use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// Package name assigned to classes declared outside any package.
pub const DEFAULT_PACKAGE: &str = "default";

/// Source file label used when an artifact carries no `SourceFile` attribute.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// A single compiled type, as produced by an artifact decoder.
///
/// Identity is the qualified name alone: two records with the same name
/// compare equal regardless of their dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    name: String,
    package: String,
    is_abstract: bool,
    source_file: String,
    imports: BTreeSet<String>,
    dependencies: BTreeMap<String, usize>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: DEFAULT_PACKAGE.to_string(),
            is_abstract: false,
            source_file: UNKNOWN_SOURCE.to_string(),
            imports: BTreeSet::new(),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Blank names fall back to the default package.
    pub fn set_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        self.package = if package.trim().is_empty() {
            DEFAULT_PACKAGE.to_string()
        } else {
            package
        };
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn set_abstract(&mut self, is_abstract: bool) {
        self.is_abstract = is_abstract;
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn set_source_file(&mut self, source_file: impl Into<String>) {
        self.source_file = source_file.into();
    }

    /// Names of the packages this class imports, never including its own.
    pub fn imported_packages(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn add_imported_package(&mut self, package: &str) {
        if package.is_empty() || package == self.package {
            return;
        }
        self.imports.insert(package.to_string());
    }

    /// Record one more reference to `class_name`.
    ///
    /// Blank names are ignored.
    pub fn add_dependency(&mut self, class_name: &str) {
        if class_name.trim().is_empty() {
            return;
        }
        *self
            .dependencies
            .entry(class_name.to_string())
            .or_insert(0) += 1;
    }

    /// Referenced class names with their occurrence counts.
    pub fn dependencies(&self) -> &BTreeMap<String, usize> {
        &self.dependencies
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Package portion of a qualified class name, or [`DEFAULT_PACKAGE`].
pub fn package_of(class_name: &str) -> &str {
    match class_name.rfind('.') {
        Some(pos) if pos > 0 => &class_name[..pos],
        _ => DEFAULT_PACKAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_class_defaults() {
        let class = Class::new("com.acme.Widget");
        assert_eq!(class.package(), DEFAULT_PACKAGE);
        assert_eq!(class.source_file(), UNKNOWN_SOURCE);
        assert!(!class.is_abstract());
        assert!(class.dependencies().is_empty());
    }

    #[test]
    fn test_blank_dependency_is_ignored() {
        let mut class = Class::new("com.acme.Widget");
        class.add_dependency("");
        class.add_dependency("   ");
        assert!(class.dependencies().is_empty());
    }

    #[test]
    fn test_repeated_dependency_increments_count() {
        let mut class = Class::new("com.acme.Widget");
        class.add_dependency("com.x.Y");
        class.add_dependency("com.x.Y");
        class.add_dependency("com.x.Y");

        assert_eq!(class.dependencies().len(), 1);
        assert_eq!(class.dependencies().get("com.x.Y"), Some(&3));
    }

    #[test]
    fn test_never_imports_own_package() {
        let mut class = Class::new("com.acme.Widget");
        class.set_package("com.acme");
        class.add_imported_package("com.acme");
        class.add_imported_package("java.util");
        class.add_imported_package("java.util");

        let imports: Vec<_> = class.imported_packages().collect();
        assert_eq!(imports, vec!["java.util"]);
    }

    #[test]
    fn test_equality_is_by_name() {
        let mut a = Class::new("com.acme.Widget");
        a.add_dependency("java.lang.String");
        let b = Class::new("com.acme.Widget");
        assert_eq!(a, b);
        assert_ne!(a, Class::new("com.acme.Gadget"));
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("com.acme.Widget"), "com.acme");
        assert_eq!(package_of("Widget"), DEFAULT_PACKAGE);
        assert_eq!(package_of(".Widget"), DEFAULT_PACKAGE);
    }
}
