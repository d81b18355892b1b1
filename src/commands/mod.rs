mod analyze;
mod count;
mod cycles;
mod init;

pub use analyze::cmd_analyze;
pub use count::cmd_count;
pub use cycles::cmd_cycles;
pub use init::cmd_init;

use crate::analysis;
use crate::api::{build_locator, default_project_root};
use crate::cli::InputArgs;
use crate::config::Config;
use crate::ingest::{ArtifactLocator, ClassFileDecoder};
use crate::model::AnalysisResult;
use crate::style;
use std::path::PathBuf;

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub locator: ArtifactLocator,
}

impl CommandContext {
    /// Resolve the input paths, load config, and set up the locator.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(input: &InputArgs) -> Result<Self, i32> {
        let mut roots = Vec::with_capacity(input.paths.len());
        for path in &input.paths {
            match path.canonicalize() {
                Ok(p) => roots.push(p),
                Err(_) => {
                    style::error(&format!("Could not resolve path: {}", style::path(path)));
                    return Err(1);
                }
            }
        }

        let project_root = match &input.project {
            Some(project) => project.canonicalize().map_err(|_| {
                style::error(&format!(
                    "Could not resolve project directory: {}",
                    style::path(project)
                ));
                1
            })?,
            None => default_project_root(&roots).map_err(|e| {
                style::error(&e.to_string());
                1
            })?,
        };

        let mut config = Config::load(&project_root).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });
        if input.no_inner_classes {
            config.ingest.include_inner_classes = false;
        }

        let locator = build_locator(&roots, &project_root, &config).map_err(|e| {
            style::error(&e.to_string());
            style::hint("Pass a directory of class files or a .jar, .zip, .war or .aar archive");
            1
        })?;

        Ok(Self {
            project_root,
            config,
            locator,
        })
    }

    pub fn project_name(&self) -> String {
        self.project_root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("project")
            .to_string()
    }

    /// Decode all artifacts and run every analysis.
    pub fn analyze(&self) -> AnalysisResult {
        let decoder = ClassFileDecoder::new();
        analysis::analyze(self.project_name(), &self.locator, &decoder, &self.config)
    }
}
