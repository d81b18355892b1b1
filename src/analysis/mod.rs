mod cycles;
mod graph;
mod metrics;
mod modules;

pub use cycles::detect_circular_dependencies;
pub use graph::{PackageFilter, PackageGraph};
pub use metrics::{PackageMetrics, collect_metrics, detect_distance_violations};
pub use modules::ModuleClassifier;

use crate::config::Config;
use crate::ingest::{ArtifactDecoder, ArtifactLocator, ClassBuilder};
use crate::model::{AnalysisResult, Issue};

pub fn analyze(
    project_name: impl Into<String>,
    locator: &ArtifactLocator,
    decoder: &dyn ArtifactDecoder,
    config: &Config,
) -> AnalysisResult {
    // Decode every located artifact
    let ingested = ClassBuilder::new(decoder, locator).build();
    let mut dataset = ingested.dataset;

    // Assign classes to configured modules
    let classifier = ModuleClassifier::new(&config.modules);
    if !classifier.is_empty() {
        let classified = classifier.classify(&mut dataset);
        tracing::debug!(classified, "classified classes into modules");
    }

    // Build package and module graphs
    let filter = PackageFilter::new(config.ignore.clone());
    let mut packages = PackageGraph::build(&dataset, &filter);
    for (name, volatility) in &config.volatility {
        if !packages.set_volatility(name, *volatility) {
            tracing::debug!(package = %name, "volatility override for unknown package");
        }
    }
    let modules = PackageGraph::build_modules(&dataset);

    // Run all analyses
    let mut issues = Vec::new();

    // Circular dependencies
    issues.extend(detect_circular_dependencies(&packages));
    issues.extend(detect_circular_dependencies(&modules));

    // Distance from the main sequence
    issues.extend(detect_distance_violations(&packages, config));

    // Artifacts that could not be read
    issues.extend(
        ingested
            .errors
            .iter()
            .map(|e| Issue::ingest_failure(e.location(), e.to_string())),
    );

    tracing::debug!(
        classes = dataset.len(),
        packages = packages.len(),
        modules = modules.len(),
        issues = issues.len(),
        "analysis complete"
    );

    AnalysisResult {
        project_name: project_name.into(),
        dataset,
        packages,
        modules,
        issues,
        ingest_errors: ingested.errors,
    }
}
