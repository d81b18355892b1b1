use crate::ingest::IngestError;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Suffix of a directly decodable artifact.
pub const ARTIFACT_SUFFIX: &str = ".class";

/// Suffixes of archive containers: jar, zip, war and Android bundles.
pub const CONTAINER_SUFFIXES: &[&str] = &[".jar", ".zip", ".war", ".aar"];

const INNER_TYPE_SEPARATOR: char = '$';

/// Finds class files and archive containers under a set of registered roots.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    roots: Vec<PathBuf>,
    include_inner_classes: bool,
    artifact_suffix: String,
    project_root: Option<PathBuf>,
}

impl Default for ArtifactLocator {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            include_inner_classes: true,
            artifact_suffix: ARTIFACT_SUFFIX.to_string(),
            project_root: None,
        }
    }
}

impl ArtifactLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `Outer$Inner` style artifacts are collected (default: yes).
    pub fn include_inner_classes(mut self, include: bool) -> Self {
        self.include_inner_classes = include;
        self
    }

    pub fn artifact_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.artifact_suffix = suffix.into().to_lowercase();
        self
    }

    /// Root that [`relative_path`](Self::relative_path) strips for display.
    pub fn project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Register a directory or archive container to be searched.
    pub fn add_root(&mut self, path: impl AsRef<Path>) -> Result<(), IngestError> {
        let path = path.as_ref();
        if path.is_dir() || self.accepts_container(path) {
            self.roots.push(path.to_path_buf());
            Ok(())
        } else {
            Err(IngestError::InvalidInput(path.to_path_buf()))
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn accepts(&self, path: &Path) -> bool {
        self.accepts_artifact(path) || self.accepts_container(path)
    }

    pub fn accepts_artifact(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.accepts_artifact_name(n))
    }

    /// Name-only acceptance, used for archive entries such as `a/b/Foo.class`.
    pub fn accepts_artifact_name(&self, name: &str) -> bool {
        let file_name = name.rsplit('/').next().unwrap_or(name);
        if !self.include_inner_classes
            && file_name
                .find(INNER_TYPE_SEPARATOR)
                .is_some_and(|pos| pos > 0)
        {
            return false;
        }
        name.to_lowercase().ends_with(&self.artifact_suffix)
    }

    pub fn accepts_container(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.accepts_container_name(n))
    }

    pub fn accepts_container_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        CONTAINER_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
    }

    /// Every acceptable artifact or container under the registered roots,
    /// deduplicated and in path order.
    pub fn locate(&self) -> BTreeSet<PathBuf> {
        let mut files = BTreeSet::new();

        for root in &self.roots {
            if root.is_file() {
                files.insert(root.clone());
                continue;
            }

            // Compiled output usually lives in ignored directories, so
            // ignore files and hidden-path rules are not applied.
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(true)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();

            for entry in walker {
                match entry {
                    Ok(entry) => {
                        if self.accepts(entry.path()) {
                            files.insert(entry.into_path());
                        }
                    }
                    Err(e) => tracing::warn!(root = %root.display(), error = %e, "skipping unreadable path"),
                }
            }
        }

        files
    }

    /// Strip the project root from `path` for display. Paths outside the
    /// root, or any path when no root is set, come back unchanged.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        match &self.project_root {
            Some(root) => path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_inner_class_filtering() {
        let locator = ArtifactLocator::new().include_inner_classes(false);
        assert!(!locator.accepts_artifact_name("Outer$Inner.class"));
        assert!(!locator.accepts_artifact_name("com/acme/Outer$1.class"));
        assert!(locator.accepts_artifact_name("$Leading.class"));
        assert!(locator.accepts_artifact_name("Outer.class"));

        let locator = ArtifactLocator::new();
        assert!(locator.accepts_artifact_name("Outer$Inner.class"));
    }

    #[test]
    fn test_suffixes_are_case_insensitive() {
        let locator = ArtifactLocator::new();
        assert!(locator.accepts_artifact_name("com/acme/Widget.CLASS"));
        assert!(!locator.accepts_artifact_name("com/acme/Widget.java"));

        for name in ["app.jar", "APP.JAR", "dist.zip", "web.war", "lib.aar"] {
            assert!(locator.accepts_container_name(name), "{} should be a container", name);
        }
        assert!(!locator.accepts_container_name("app.tar"));
    }

    #[test]
    fn test_add_root_rejects_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        let class = dir.path().join("Foo.class");
        let jar = dir.path().join("lib.jar");
        fs::write(&text, "hello").unwrap();
        fs::write(&class, "x").unwrap();
        fs::write(&jar, "x").unwrap();

        let mut locator = ArtifactLocator::new();
        assert!(locator.add_root(dir.path()).is_ok());
        assert!(locator.add_root(&jar).is_ok());
        assert!(matches!(
            locator.add_root(&text),
            Err(IngestError::InvalidInput(_))
        ));
        assert!(matches!(
            locator.add_root(&class),
            Err(IngestError::InvalidInput(_))
        ));
        assert!(locator.add_root(dir.path().join("missing")).is_err());
        assert_eq!(locator.roots().len(), 2);
    }

    #[test]
    fn test_locate_walks_and_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("com").join("acme");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Widget.class"), "x").unwrap();
        fs::write(nested.join("Widget$Part.class"), "x").unwrap();
        fs::write(nested.join("Widget.java"), "x").unwrap();
        fs::write(dir.path().join("deps.jar"), "x").unwrap();
        // A directory whose name looks like an archive is searched, not accepted.
        let fake_jar = dir.path().join("exploded.jar");
        fs::create_dir_all(&fake_jar).unwrap();
        fs::write(fake_jar.join("Inside.class"), "x").unwrap();

        let mut locator = ArtifactLocator::new().include_inner_classes(false);
        locator.add_root(dir.path()).unwrap();
        locator.add_root(dir.path()).unwrap();

        let found: Vec<_> = locator
            .locate()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("com/acme/Widget.class"),
                PathBuf::from("deps.jar"),
                PathBuf::from("exploded.jar/Inside.class"),
            ]
        );
    }

    #[test]
    fn test_relative_path() {
        let locator = ArtifactLocator::new().project_root("/proj");
        assert_eq!(
            locator.relative_path(Path::new("/proj/src/Foo.class")),
            PathBuf::from("src/Foo.class")
        );
        assert_eq!(
            locator.relative_path(Path::new("/other/Foo.class")),
            PathBuf::from("/other/Foo.class")
        );
        assert_eq!(
            locator.relative_path(Path::new("/project/Foo.class")),
            PathBuf::from("/project/Foo.class")
        );

        let unrooted = ArtifactLocator::new();
        assert_eq!(
            unrooted.relative_path(Path::new("/proj/src/Foo.class")),
            PathBuf::from("/proj/src/Foo.class")
        );
    }
}
