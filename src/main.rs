use clap::Parser;
use jarmap::cli::{AnalyzeArgs, Cli, Command, InputArgs};
use jarmap::{cmd_analyze, cmd_count, cmd_cycles, cmd_init};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Library diagnostics go to stderr; RUST_LOG=debug shows per-run summaries
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let exit_code = match cli.command {
        Some(Command::Analyze(args)) => cmd_analyze(args),
        Some(Command::Cycles(args)) => cmd_cycles(args),
        Some(Command::Count(args)) => cmd_count(args),
        Some(Command::Init(args)) => cmd_init(args),
        None => {
            // No subcommand: analyze the given paths
            let args = AnalyzeArgs {
                input: InputArgs {
                    paths: cli.paths,
                    ..Default::default()
                },
                ..Default::default()
            };
            cmd_analyze(args)
        }
    };

    std::process::exit(exit_code);
}
