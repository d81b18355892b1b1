mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::{AnalysisResult, Issue, IssueSeverity};
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()>;
}

/// Issues at or above `min_severity`, in report order.
pub fn reported_issues(result: &AnalysisResult, min_severity: IssueSeverity) -> Vec<&Issue> {
    result
        .issues
        .iter()
        .filter(|i| i.severity >= min_severity)
        .collect()
}
