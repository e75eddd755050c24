//! `poetspen new`

use anyhow::{Context as _, Result};
use poetspen_core::RecreateStrategy;
use poetspen_projects::{CreateOptions, ProjectCreator};

use super::Context;
use crate::cli::NewArgs;
use crate::output;

pub fn run(args: NewArgs, ctx: &Context) -> Result<()> {
    let options = options(&args, ctx);
    let poetry = ctx.package_manager();
    poetry.ensure_available()?;

    if !ctx.quiet {
        output::header("Create New Project");
        output::kv("Project name", &args.name);
        output::kv("Location", ctx.root_path.join(&args.name).as_str());
        output::kv("Categories", &options.categories.join(", "));
        println!();
    }

    if args.recreate && ctx.config.recreate_strategy == RecreateStrategy::DeleteFirst {
        output::warning(&format!(
            "recreate-strategy is {}: the existing project is deleted before scaffolding",
            RecreateStrategy::DeleteFirst
        ));
    }

    let spinner = (!ctx.quiet).then(|| output::spinner("Creating project..."));
    let result = ProjectCreator::new(&poetry, ctx.materializer())
        .create(&ctx.root_path, &args.name, &options)
        .with_context(|| format!("Failed to create project '{}'", args.name));
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let created = result?;

    if ctx.quiet {
        return Ok(());
    }

    output::success(&format!(
        "Created {} at {}",
        created.handle.name(),
        created.handle.root()
    ));
    for name in &created.copied {
        output::kv("Copied", name);
    }
    match &created.env {
        Some(env) => output::kv("Environment", env.path.as_str()),
        None => output::info(&format!(
            "Skipped install; run `poetspen -p {} install {}` when ready",
            ctx.root_path,
            created.handle.name()
        )),
    }

    Ok(())
}

/// Configuration with this invocation's flags applied on top
fn options(args: &NewArgs, ctx: &Context) -> CreateOptions {
    let mut options = CreateOptions::from_config(&ctx.config, args.recreate);
    if !args.categories.is_empty() {
        options.categories = args.categories.clone();
    }
    if args.no_install {
        options.install = false;
    }
    options
}
