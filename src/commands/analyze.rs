use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::model::{AnalysisResult, IssueSeverity};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use super::CommandContext;

pub fn cmd_analyze(args: AnalyzeArgs) -> i32 {
    let mut ctx = match CommandContext::new(&args.input) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    // CLI override for the distance threshold
    if let Some(max_distance) = args.max_distance {
        ctx.config.thresholds.max_distance = max_distance;
    }

    let result = ctx.analyze();

    if let Err(code) = write_report(&result, &args) {
        return code;
    }

    // Exit code 0 = ran successfully (with or without warnings/info)
    // Exit code 1 = has errors (dependency cycles that should block CI)
    let has_errors = result
        .issues
        .iter()
        .any(|issue| issue.severity == IssueSeverity::Error);

    if has_errors { 1 } else { 0 }
}

fn write_report(result: &AnalysisResult, args: &AnalyzeArgs) -> Result<(), i32> {
    // Set up output
    let mut output: Box<dyn Write> = match &args.output {
        Some(output_path) => match File::create(output_path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                style::error(&format!("Could not create output file: {}", e));
                return Err(1);
            }
        },
        None => Box::new(io::stdout()),
    };

    // Format output to string first
    let mut buffer = Vec::new();
    let format_result = match args.format {
        OutputFormat::Markdown => MarkdownOutput::new(args.min_severity).format(result, &mut buffer),
        OutputFormat::Json => JsonOutput::new(args.min_severity).format(result, &mut buffer),
    };

    if let Err(e) = format_result {
        style::error(&format!("Failed to format output: {}", e));
        return Err(1);
    }

    let output_str = String::from_utf8_lossy(&buffer);

    // Render markdown nicely to terminal, or write plain text to file/pipe
    let write_result = if args.output.is_none() && args.format == OutputFormat::Markdown {
        style::render_markdown(&output_str, &mut output)
    } else {
        write!(output, "{}", output_str)
    }
    .and_then(|_| output.flush());

    if let Err(e) = write_result {
        style::error(&format!("Failed to write output: {}", e));
        return Err(1);
    }

    Ok(())
}
