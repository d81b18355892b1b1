use crate::model::IssueSeverity;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jarmap")]
#[command(about = "Package dependency metrics and cycle detection for compiled JVM artifacts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directories or archives to analyze (defaults to current directory)
    /// Used when no subcommand is specified
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Report package metrics and dependency issues (default behavior)
    Analyze(AnalyzeArgs),

    /// List dependency cycles between packages
    Cycles(CyclesArgs),

    /// Count class files without decoding them
    Count(CountArgs),

    /// Generate a starter .jarmap.toml configuration file
    Init(InitArgs),
}

/// Inputs shared by every command that reads artifacts.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Directories of class files, or .jar/.zip/.war/.aar archives
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Project directory holding .jarmap.toml (defaults to the first path)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Skip nested classes (Outer$Inner.class)
    #[arg(long)]
    pub no_inner_classes: bool,
}

impl Default for InputArgs {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from(".")],
            project: None,
            no_inner_classes: false,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum severity to report
    #[arg(long, default_value = "info")]
    pub min_severity: IssueSeverity,

    /// Report packages further than this from the main sequence
    #[arg(long)]
    pub max_distance: Option<f64>,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Show every package on a reachable cycle instead of the first cycle
    #[arg(long)]
    pub all: bool,

    /// Use the module graph from [modules] instead of packages
    #[arg(long)]
    pub modules: bool,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct CountArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .jarmap.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cycles_args() {
        let cli = Cli::parse_from(["jarmap", "cycles", "--all", "a.jar", "build/classes"]);
        match cli.command {
            Some(Command::Cycles(args)) => {
                assert!(args.all);
                assert!(!args.modules);
                assert_eq!(
                    args.input.paths,
                    vec![PathBuf::from("a.jar"), PathBuf::from("build/classes")]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::parse_from([
            "jarmap",
            "analyze",
            "--format",
            "json",
            "--min-severity",
            "warn",
            "--no-inner-classes",
        ]);
        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.min_severity, IssueSeverity::Warn);
                assert!(args.input.no_inner_classes);
                assert_eq!(args.input.paths, vec![PathBuf::from(".")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_command_takes_paths() {
        let cli = Cli::parse_from(["jarmap", "lib.jar"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.paths, vec![PathBuf::from("lib.jar")]);
    }
}
