use crate::analysis::{PackageGraph, PackageMetrics, collect_metrics};
use crate::model::{AnalysisResult, Issue, IssueSeverity};
use crate::output::{OutputFormatter, reported_issues};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

pub struct JsonOutput {
    pub min_severity: IssueSeverity,
}

impl JsonOutput {
    pub fn new(min_severity: IssueSeverity) -> Self {
        Self { min_severity }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new(IssueSeverity::Info)
    }
}

#[derive(Serialize)]
struct JsonResult<'a> {
    project_name: &'a str,
    summary: JsonSummary,
    packages: Vec<JsonPackage<'a>>,
    modules: Vec<JsonPackage<'a>>,
    classes: Vec<JsonClass<'a>>,
    issues: Vec<&'a Issue>,
}

#[derive(Serialize)]
struct JsonSummary {
    classes: usize,
    packages: usize,
    modules: usize,
    ingest_errors: usize,
}

#[derive(Serialize)]
struct JsonPackage<'a> {
    #[serde(flatten)]
    metrics: PackageMetrics,
    efferents: &'a BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct JsonClass<'a> {
    name: &'a str,
    package: &'a str,
    is_abstract: bool,
    source_file: &'a str,
    module: Option<&'a str>,
    dependencies: &'a BTreeMap<String, usize>,
}

fn packages(graph: &PackageGraph) -> Vec<JsonPackage<'_>> {
    collect_metrics(graph)
        .into_iter()
        .filter_map(|metrics| {
            let package = graph.package(&metrics.name)?;
            Some(JsonPackage {
                efferents: package.efferents(),
                metrics,
            })
        })
        .collect()
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        let json_result = JsonResult {
            project_name: &result.project_name,
            summary: JsonSummary {
                classes: result.dataset.len(),
                packages: result.packages.len(),
                modules: result.modules.len(),
                ingest_errors: result.ingest_errors.len(),
            },
            packages: packages(&result.packages),
            modules: packages(&result.modules),
            classes: result
                .dataset
                .classes()
                .map(|c| JsonClass {
                    name: c.name(),
                    package: c.package(),
                    is_abstract: c.is_abstract(),
                    source_file: c.source_file(),
                    module: result.dataset.module_of(c.name()),
                    dependencies: c.dependencies(),
                })
                .collect(),
            issues: reported_issues(result, self.min_severity),
        };

        let json = serde_json::to_string_pretty(&json_result).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, ClassDataset};

    #[test]
    fn test_json_output_shape() {
        let mut dataset = ClassDataset::new();
        let mut main = Class::new("app.Main");
        main.set_package("app");
        main.add_dependency("core.Model");
        dataset.add_class(main);
        dataset.put_class_module("app.Main", "application");

        let mut packages = PackageGraph::new();
        packages.depends_upon("app", "core", 1);

        let result = AnalysisResult {
            project_name: "demo".to_string(),
            dataset,
            packages,
            modules: PackageGraph::new(),
            issues: vec![Issue::ingest_failure("lib.jar".into(), "bad".into())],
            ingest_errors: Vec::new(),
        };

        let mut buffer = Vec::new();
        JsonOutput::default().format(&result, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["project_name"], "demo");
        assert_eq!(value["summary"]["packages"], 2);
        assert_eq!(value["packages"][0]["name"], "app");
        assert_eq!(value["packages"][0]["instability"], 1.0);
        assert_eq!(value["packages"][0]["efferents"]["core"], 1);
        assert_eq!(value["classes"][0]["module"], "application");
        assert_eq!(value["issues"][0]["severity"], "Info");

        let mut buffer = Vec::new();
        JsonOutput::new(IssueSeverity::Warn)
            .format(&result, &mut buffer)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["issues"].as_array().map(Vec::len), Some(0));
    }
}
