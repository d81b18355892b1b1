use crate::cli::CountArgs;
use crate::ingest::ClassBuilder;

use super::CommandContext;

pub fn cmd_count(args: CountArgs) -> i32 {
    let ctx = match CommandContext::new(&args.input) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    println!("{}", ClassBuilder::count_classes(&ctx.locator));
    0
}
