//! `poetspen templates`

use anyhow::Result;
use console::style;
use poetspen_projects::templates::TemplateFile;

use super::Context;
use crate::cli::TemplatesArgs;
use crate::output;

pub fn run(args: TemplatesArgs, ctx: &Context) -> Result<()> {
    let materializer = ctx.materializer();
    let categories = if args.categories.is_empty() {
        ctx.config.categories.clone()
    } else {
        args.categories
    };

    let selected = materializer.select(&categories)?;

    output::header("Templates");
    output::kv("Categories", &categories.join(", "));
    println!();

    if selected.is_empty() {
        output::info("No templates match the selected categories");
    }
    for template in &selected {
        print_template(template, true);
    }

    if args.all {
        for template in materializer.source().list()? {
            if !selected.iter().any(|s| s.relative_path == template.relative_path) {
                print_template(&template, false);
            }
        }
    }

    Ok(())
}

fn print_template(template: &TemplateFile, selected: bool) {
    let target = template.to_string();
    let line = format!(
        "  {:<36} {:<10} {}",
        target, template.category, template.relative_path
    );
    if selected {
        println!("{}", line);
    } else {
        println!("{}", style(line).dim());
    }
}
