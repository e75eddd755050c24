//! `poetspen install`

use anyhow::Result;
use poetspen_projects::Bridge;

use super::Context;
use crate::cli::InstallArgs;
use crate::output;

pub fn run(args: InstallArgs, ctx: &Context) -> Result<()> {
    let poetry = ctx.package_manager();
    let bridge = Bridge::setup(&poetry, &ctx.project_dir(args.project.as_deref()))?;

    let spinner = (!ctx.quiet).then(|| output::spinner("Installing dependencies..."));
    let result = bridge
        .create_environment()
        .and_then(|env| bridge.install(args.update).map(|_| env));
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let env = result?;

    if !ctx.quiet {
        output::success(&format!("Installed {}", bridge.handle().name()));
        output::kv("Environment", env.path.as_str());
    }
    Ok(())
}
