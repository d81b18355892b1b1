mod class;
mod dataset;
mod issue;
mod package;

pub use class::{Class, DEFAULT_PACKAGE, UNKNOWN_SOURCE, package_of};
pub use dataset::ClassDataset;
pub use issue::{Issue, IssueKind, IssueSeverity};
pub use package::{Package, PackageRole};

use crate::analysis::PackageGraph;
use crate::ingest::IngestError;

pub struct AnalysisResult {
    pub project_name: String,
    pub dataset: ClassDataset,
    pub packages: PackageGraph,
    pub modules: PackageGraph,
    pub issues: Vec<Issue>,
    pub ingest_errors: Vec<IngestError>,
}
