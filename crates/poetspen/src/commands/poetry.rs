//! `poetspen poetry`

use anyhow::Result;
use poetspen_projects::Bridge;

use super::Context;
use crate::cli::PoetryArgs;

/// Returns the child's exit code
pub fn run(args: PoetryArgs, ctx: &Context) -> Result<i32> {
    let args = args.take_trailing_flags();
    let poetry = ctx.package_manager();
    let bridge = Bridge::setup(&poetry, &ctx.project_dir(args.project.as_deref()))?;

    tracing::debug!(
        "Forwarding '{}' ({})",
        args.command,
        if args.pass_through { "pass-through" } else { "managed" }
    );
    Ok(bridge.poetry_command(&args.command, &args.args, !args.pass_through)?)
}
