use crate::ingest::ARTIFACT_SUFFIX;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".jarmap.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ingest: IngestSettings,
    pub thresholds: Thresholds,
    /// Package prefixes left out of the package graph.
    pub ignore: Vec<String>,
    /// Per-package volatility overrides.
    pub volatility: BTreeMap<String, u32>,
    /// Module label to the package prefixes it owns.
    pub modules: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub include_inner_classes: bool,
    pub artifact_suffix: String,
}

#[derive(Debug, Clone)]
pub struct Thresholds {
    pub max_distance: f64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ingest: Option<RawIngest>,
    thresholds: Option<RawThresholds>,
    filter: Option<RawFilter>,
    volatility: Option<BTreeMap<String, u32>>,
    modules: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct RawIngest {
    include_inner_classes: Option<bool>,
    artifact_suffix: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    max_distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFilter {
    ignore: Option<Vec<String>>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            include_inner_classes: true,
            artifact_suffix: ARTIFACT_SUFFIX.to_string(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { max_distance: 0.5 }
    }
}

impl Config {
    pub fn load(project_path: &Path) -> Result<Self, ConfigError> {
        let config_path = project_path.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let ingest = match raw.ingest {
            Some(i) => {
                let defaults = IngestSettings::default();
                IngestSettings {
                    include_inner_classes: i
                        .include_inner_classes
                        .unwrap_or(defaults.include_inner_classes),
                    artifact_suffix: i.artifact_suffix.unwrap_or(defaults.artifact_suffix),
                }
            }
            None => IngestSettings::default(),
        };

        let thresholds = match raw.thresholds {
            Some(t) => Thresholds {
                max_distance: t.max_distance.unwrap_or(0.5),
            },
            None => Thresholds::default(),
        };

        Ok(Self {
            ingest,
            thresholds,
            ignore: raw.filter.and_then(|f| f.ignore).unwrap_or_default(),
            volatility: raw.volatility.unwrap_or_default(),
            modules: raw.modules.unwrap_or_default(),
        })
    }
}

pub fn generate_config_template() -> String {
    format!(
        r#"# jarmap configuration

[ingest]
# Count nested classes (Outer$Inner.class) as classes of their own.
include_inner_classes = true
artifact_suffix = "{suffix}"

[thresholds]
# Packages further than this from the main sequence are reported.
max_distance = 0.5

[filter]
# Package prefixes left out of the analysis. A trailing '.' or '*'
# matches any package starting with the prefix.
ignore = ["java.", "javax."]

[volatility]
# Packages that rarely change can be excluded from distance checks.
# "com.example.vendor" = 0

[modules]
# Group packages into modules by prefix; the longest prefix wins.
# core = ["com.example.core", "com.example.model"]
# web = ["com.example.web"]
"#,
        suffix = ARTIFACT_SUFFIX
    )
}
