use crate::analysis::PackageGraph;
use crate::cli::CyclesArgs;
use crate::style;
use colored::Colorize;

use super::CommandContext;

pub fn cmd_cycles(args: CyclesArgs) -> i32 {
    let ctx = match CommandContext::new(&args.input) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let result = ctx.analyze();
    let (graph, kind) = if args.modules {
        (&result.modules, "module")
    } else {
        (&result.packages, "package")
    };

    let lines = cycle_report(graph, args.all);

    if lines.is_empty() {
        style::success(&format!("No {} cycles found", kind));
        return 0;
    }

    style::header(&format!("Cycles reachable from {} {}(s):", lines.len(), kind));
    for (name, path) in &lines {
        println!("{}: {}", name.bold(), style::cycle(path));
    }

    1
}

/// One entry per package from which a cycle is reachable: the trimmed first
/// cycle, or every package on a reachable cycle when `all` is set.
pub fn cycle_report(graph: &PackageGraph, all: bool) -> Vec<(String, Vec<String>)> {
    graph
        .packages_reaching_cycles()
        .into_iter()
        .filter_map(|name| {
            let path = if all {
                let mut path = Vec::new();
                graph.collect_all_cycles(&name, &mut path).then_some(path)?
            } else {
                graph.first_cycle(&name)?
            };
            Some((name, path))
        })
        .collect()
}
