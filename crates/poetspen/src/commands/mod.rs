//! CLI command implementations

pub mod install;
pub mod new;
pub mod poetry;
pub mod run;
pub mod templates;

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use poetspen_core::{ConfigLoader, ToolConfig};
use poetspen_projects::{PoetryCli, TemplateMaterializer, TemplateSource};

use crate::cli::{Cli, Commands};

/// State shared by every command
pub struct Context {
    pub config: ToolConfig,
    pub root_path: Utf8PathBuf,
    pub quiet: bool,
}

impl Context {
    /// Resolve configuration for this invocation
    pub fn load(config_file: Option<&Utf8Path>, root_path: Utf8PathBuf, quiet: bool) -> Result<Self> {
        let config = ConfigLoader::new()
            .and_then(|loader| loader.load(config_file))
            .context("Failed to load configuration")?;
        tracing::debug!("Resolved configuration: {:?}", config);

        Ok(Self {
            config,
            root_path,
            quiet,
        })
    }

    /// Directory of an existing project: `root_path/name`, or `root_path`
    /// itself when no name is given
    pub fn project_dir(&self, name: Option<&str>) -> Utf8PathBuf {
        match name {
            Some(name) => self.root_path.join(name),
            None => self.root_path.clone(),
        }
    }

    pub fn package_manager(&self) -> PoetryCli {
        PoetryCli::from_config(&self.config)
    }

    /// Materializer over the configured template tree, embedded by default
    pub fn materializer(&self) -> TemplateMaterializer {
        TemplateMaterializer::new(TemplateSource::from_dir(self.config.template_dir.clone()))
    }
}

/// Run the selected command, returning the process exit code
pub fn dispatch(cli: Cli) -> Result<i32> {
    let ctx = Context::load(cli.config.as_deref(), cli.root_path, cli.quiet)?;

    match cli.command {
        Commands::New(args) => new::run(args, &ctx).map(|_| 0),
        Commands::Install(args) => install::run(args, &ctx).map(|_| 0),
        Commands::Run(args) => run::run(args, &ctx),
        Commands::Poetry(args) => poetry::run(args, &ctx),
        Commands::Templates(args) => templates::run(args, &ctx).map(|_| 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(root: &str) -> Context {
        Context {
            config: ToolConfig::default(),
            root_path: Utf8PathBuf::from(root),
            quiet: true,
        }
    }

    #[test]
    fn test_project_dir() {
        let ctx = context("/work");
        assert_eq!(ctx.project_dir(Some("demo")), Utf8PathBuf::from("/work/demo"));
        assert_eq!(ctx.project_dir(None), Utf8PathBuf::from("/work"));
    }

    #[test]
    fn test_materializer_follows_template_dir() {
        let mut ctx = context("/work");
        assert!(matches!(ctx.materializer().source(), TemplateSource::Embedded));

        ctx.config.template_dir = Some(Utf8PathBuf::from("/opt/templates"));
        assert!(matches!(
            ctx.materializer().source(),
            TemplateSource::Directory(dir) if dir == "/opt/templates"
        ));
    }
}
