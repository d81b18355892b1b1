use crate::model::Class;
use std::collections::BTreeMap;
use std::sync::Arc;

/// All classes discovered by one ingestion run, keyed by qualified name,
/// plus the class → module label side table.
#[derive(Debug, Clone, Default)]
pub struct ClassDataset {
    classes: BTreeMap<String, Arc<Class>>,
    class_modules: BTreeMap<String, String>,
}

impl ClassDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decoded class. A later class with the same name replaces the
    /// earlier one; the replaced record is returned.
    pub fn add_class(&mut self, class: Class) -> Option<Arc<Class>> {
        self.classes.insert(class.name().to_string(), Arc::new(class))
    }

    pub fn class(&self, name: &str) -> Option<&Arc<Class>> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn put_class_module(&mut self, class_name: &str, module: impl Into<String>) {
        self.class_modules.insert(class_name.to_string(), module.into());
    }

    pub fn module_of(&self, class_name: &str) -> Option<&str> {
        self.class_modules.get(class_name).map(String::as_str)
    }

    /// Class name → module label for every classified class.
    pub fn class_modules(&self) -> &BTreeMap<String, String> {
        &self.class_modules
    }
}
