use super::PackageRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    /// Packages (or artifact paths, for ingestion failures) the issue refers to.
    pub locations: Vec<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum IssueKind {
    CircularDependency,
    MainSequenceDistance { distance: f64 },
    IngestFailure,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    #[default]
    Info,
    Warn,
    Error,
}

impl Issue {
    /// `cycle` starts and ends with the same node. `role` says whether the
    /// nodes are packages or modules.
    pub fn circular_dependency(role: PackageRole, component: Vec<String>, cycle: &[String]) -> Self {
        let (label, plural) = match role {
            PackageRole::Package => ("Package", "packages"),
            PackageRole::Module => ("Module", "modules"),
        };

        Self {
            kind: IssueKind::CircularDependency,
            severity: IssueSeverity::Error,
            message: format!(
                "{} cycle among {} {}: {}",
                label,
                component.len(),
                plural,
                cycle.join(" → ")
            ),
            locations: component,
            suggestion: Some(format!(
                "Break the cycle by moving shared types into a lower-level {} or inverting a dependency through an interface",
                label.to_lowercase()
            )),
        }
    }

    pub fn main_sequence_distance(
        package: String,
        distance: f64,
        abstractness: f64,
        instability: f64,
    ) -> Self {
        let suggestion = if abstractness + instability < 1.0 {
            "Concrete and heavily depended upon: consider extracting interfaces"
        } else {
            "Abstract but rarely depended upon: consider folding abstractions into their users"
        };

        Self {
            kind: IssueKind::MainSequenceDistance { distance },
            severity: IssueSeverity::Warn,
            locations: vec![package],
            message: format!(
                "Distance {:.2} from the main sequence (A = {:.2}, I = {:.2})",
                distance, abstractness, instability
            ),
            suggestion: Some(suggestion.to_string()),
        }
    }

    pub fn ingest_failure(location: String, message: String) -> Self {
        Self {
            kind: IssueKind::IngestFailure,
            severity: IssueSeverity::Info,
            locations: vec![location],
            message,
            suggestion: None,
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Info => write!(f, "info"),
            IssueSeverity::Warn => write!(f, "warn"),
            IssueSeverity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(IssueSeverity::Info),
            "warn" | "warning" => Ok(IssueSeverity::Warn),
            "error" => Ok(IssueSeverity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}
