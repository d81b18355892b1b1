use crate::analysis::{PackageMetrics, collect_metrics};
use crate::model::{AnalysisResult, Issue, IssueKind, IssueSeverity};
use crate::output::{OutputFormatter, reported_issues};
use std::io::Write;

pub struct MarkdownOutput {
    pub min_severity: IssueSeverity,
}

impl MarkdownOutput {
    pub fn new(min_severity: IssueSeverity) -> Self {
        Self { min_severity }
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Package Analysis: {}\n", result.project_name)?;

        let packages = collect_metrics(&result.packages);
        let (analyzed, external): (Vec<_>, Vec<_>) =
            packages.iter().partition(|m| m.class_count > 0);

        // Summary
        writeln!(writer, "## Summary\n")?;
        writeln!(writer, "- Classes: {}", result.dataset.len())?;
        writeln!(writer, "- Packages: {}", analyzed.len())?;
        writeln!(writer, "- External packages referenced: {}", external.len())?;
        if !result.modules.is_empty() {
            writeln!(writer, "- Modules: {}", result.modules.len())?;
        }
        if !result.ingest_errors.is_empty() {
            writeln!(
                writer,
                "- Artifacts that could not be read: {}",
                result.ingest_errors.len()
            )?;
        }
        writeln!(writer)?;

        // Package metrics
        if !analyzed.is_empty() {
            writeln!(writer, "## Packages\n")?;
            write_metrics_table(writer, "Package", &analyzed)?;
        }

        // Module metrics
        if !result.modules.is_empty() {
            let modules = collect_metrics(&result.modules);
            let modules: Vec<_> = modules.iter().collect();
            writeln!(writer, "## Modules\n")?;
            write_metrics_table(writer, "Module", &modules)?;
        }

        let issues = reported_issues(result, self.min_severity);

        if issues.is_empty() {
            writeln!(writer, "## No Issues Found\n")?;
            writeln!(writer, "No dependency issues detected.")?;
            return Ok(());
        }

        writeln!(writer, "## Issues Found\n")?;

        // Circular Dependencies (Error severity)
        let circular: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::CircularDependency))
            .collect();

        if !circular.is_empty() {
            writeln!(writer, "### 🔴 Circular Dependencies\n")?;
            for issue in circular {
                write_issue(writer, issue)?;
            }
            writeln!(writer)?;
        }

        // Distance from the main sequence
        let distance: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::MainSequenceDistance { .. }))
            .collect();

        if !distance.is_empty() {
            writeln!(writer, "### 🟡 Off the Main Sequence\n")?;
            for issue in distance {
                if let Some(package) = issue.locations.first() {
                    writeln!(writer, "- `{}` - {}", package, issue.message)?;
                }
                if let Some(ref suggestion) = issue.suggestion {
                    writeln!(writer, "  → {}", suggestion)?;
                }
            }
            writeln!(writer)?;
        }

        // Ingestion failures
        let failures: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::IngestFailure))
            .collect();

        if !failures.is_empty() {
            writeln!(writer, "### 🔵 Unreadable Artifacts\n")?;
            for issue in failures.iter().take(20) {
                writeln!(writer, "- {}", issue.message)?;
            }
            if failures.len() > 20 {
                writeln!(writer, "- ... and {} more", failures.len() - 20)?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

fn write_metrics_table<W: Write>(
    writer: &mut W,
    label: &str,
    rows: &[&PackageMetrics],
) -> std::io::Result<()> {
    writeln!(
        writer,
        "| {} | Cc | Ac | Ca | Ce | A | I | D | V | Cycle |",
        label
    )?;
    writeln!(writer, "|---|---:|---:|---:|---:|---:|---:|---:|---:|:---:|")?;
    for m in rows {
        writeln!(
            writer,
            "| `{}` | {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {} | {} |",
            m.name,
            m.concrete_class_count,
            m.abstract_class_count,
            m.afferent_coupling,
            m.efferent_coupling,
            m.abstractness,
            m.instability,
            m.distance,
            m.volatility,
            if m.has_cycle { "yes" } else { "" }
        )?;
    }
    writeln!(writer)
}

fn write_issue<W: Write>(writer: &mut W, issue: &Issue) -> std::io::Result<()> {
    writeln!(writer, "- {}", issue.message)?;
    if let Some(ref suggestion) = issue.suggestion {
        writeln!(writer, "  → {}", suggestion)?;
    }
    Ok(())
}
