//! Library API for jarmap.
//!
//! These functions mirror the CLI commands but return results instead of
//! printing them and exiting.
//!
//! # Example
//!
//! ```no_run
//! use jarmap::{analyze, AnalysisOptions};
//!
//! let result = analyze(&["target/classes"], AnalysisOptions::default())?;
//! println!("Found {} classes", result.dataset.len());
//! for issue in &result.issues {
//!     println!("Issue: {}", issue.message);
//! }
//! # Ok::<(), jarmap::JarmapError>(())
//! ```

use crate::analysis;
use crate::config::{Config, ConfigError};
use crate::ingest::{ArtifactLocator, ClassBuilder, ClassFileDecoder, IngestError};
use crate::model::AnalysisResult;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during jarmap operations.
#[derive(Debug, Error)]
pub enum JarmapError {
    /// The specified path could not be found or resolved.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A root was neither a directory nor an archive container.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error during analysis.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for [`analyze`] and [`count_classes`].
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Directory holding `.jarmap.toml` and used to shorten reported paths.
    /// Defaults to the first root (or its parent, when that root is a file).
    pub project_root: Option<PathBuf>,

    /// Overrides `[ingest] include_inner_classes` from the config file.
    pub include_inner_classes: Option<bool>,

    /// Overrides `[thresholds] max_distance` from the config file.
    pub max_distance: Option<f64>,
}

/// Resolved inputs shared by every entry point.
struct Session {
    project_root: PathBuf,
    config: Config,
    locator: ArtifactLocator,
}

impl Session {
    fn open<P: AsRef<Path>>(roots: &[P], options: &AnalysisOptions) -> Result<Self, JarmapError> {
        let mut resolved = Vec::with_capacity(roots.len());
        for root in roots {
            let root = root.as_ref();
            let path = root
                .canonicalize()
                .map_err(|_| JarmapError::PathNotFound(root.to_path_buf()))?;
            resolved.push(path);
        }

        let project_root = match &options.project_root {
            Some(root) => root
                .canonicalize()
                .map_err(|_| JarmapError::PathNotFound(root.clone()))?,
            None => default_project_root(&resolved)?,
        };

        let mut config = Config::load(&project_root)?;
        if let Some(include) = options.include_inner_classes {
            config.ingest.include_inner_classes = include;
        }
        if let Some(max_distance) = options.max_distance {
            config.thresholds.max_distance = max_distance;
        }

        let locator = build_locator(&resolved, &project_root, &config)?;

        Ok(Self {
            project_root,
            config,
            locator,
        })
    }

    fn project_name(&self) -> String {
        self.project_root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("project")
            .to_string()
    }
}

/// The first root if it is a directory, otherwise the directory containing
/// it. With no roots, the current directory.
pub fn default_project_root(roots: &[PathBuf]) -> Result<PathBuf, JarmapError> {
    let first = match roots.first() {
        Some(first) => first,
        None => return Ok(std::env::current_dir()?),
    };

    if first.is_dir() {
        Ok(first.clone())
    } else {
        Ok(first
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| first.clone()))
    }
}

/// Configure a locator for `roots` from the loaded config.
pub fn build_locator<P: AsRef<Path>>(
    roots: &[P],
    project_root: &Path,
    config: &Config,
) -> Result<ArtifactLocator, IngestError> {
    let mut locator = ArtifactLocator::new()
        .include_inner_classes(config.ingest.include_inner_classes)
        .artifact_suffix(config.ingest.artifact_suffix.as_str())
        .project_root(project_root);

    for root in roots {
        locator.add_root(root)?;
    }

    Ok(locator)
}

/// Decode every class under `roots` and compute package metrics and issues.
///
/// Each root is a directory of class files or an archive container (`.jar`,
/// `.zip`, `.war`, `.aar`). Unreadable artifacts do not fail the run; they
/// are listed in [`AnalysisResult::ingest_errors`] and as issues.
pub fn analyze<P: AsRef<Path>>(
    roots: &[P],
    options: AnalysisOptions,
) -> Result<AnalysisResult, JarmapError> {
    let session = Session::open(roots, &options)?;
    let decoder = ClassFileDecoder::new();

    Ok(analysis::analyze(
        session.project_name(),
        &session.locator,
        &decoder,
        &session.config,
    ))
}

/// Count the class files under `roots`, including those inside containers,
/// without decoding them.
pub fn count_classes<P: AsRef<Path>>(
    roots: &[P],
    options: AnalysisOptions,
) -> Result<usize, JarmapError> {
    let session = Session::open(roots, &options)?;
    Ok(ClassBuilder::count_classes(&session.locator))
}
