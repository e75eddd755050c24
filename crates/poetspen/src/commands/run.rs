//! `poetspen run`

use anyhow::Result;
use poetspen_projects::Bridge;

use super::Context;
use crate::cli::RunArgs;

/// Returns the child's exit code
pub fn run(args: RunArgs, ctx: &Context) -> Result<i32> {
    let poetry = ctx.package_manager();
    let bridge = Bridge::setup(&poetry, &ctx.project_dir(args.project.as_deref()))?;
    Ok(bridge.run(&args.args)?)
}
