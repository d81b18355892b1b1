pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod ingest;
pub mod model;
pub mod output;
pub mod style;

pub use api::{AnalysisOptions, JarmapError, analyze, count_classes};
pub use cli::Cli;
pub use commands::{cmd_analyze, cmd_count, cmd_cycles, cmd_init};
pub use config::Config;
pub use model::AnalysisResult;
