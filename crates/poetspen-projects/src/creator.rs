//! The full `new` pipeline: scaffold, copy templates, patch the manifest,
//! create the environment and install.

use crate::bridge::Bridge;
use crate::error::Result;
use crate::initializer::ProjectInitializer;
use crate::manifest::{add_item, nested_table, Manifest};
use crate::package_manager::PackageManager;
use crate::templates::{Destination, TemplateFile, TemplateMaterializer};
use crate::types::{EnvHandle, ProjectHandle, Recreate};
use camino::Utf8Path;
use poetspen_core::ToolConfig;
use toml_edit::{value, Array};
use tracing::{debug, info};

/// Version requirement added for pytest when its templates are copied
pub const PYTEST_REQUIREMENT: &str = "^8.0";

/// Options for [`ProjectCreator::create`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Template categories, highest priority first
    pub categories: Vec<String>,
    /// Behaviour when the project already exists
    pub recreate: Recreate,
    /// Create the environment and install after scaffolding
    pub install: bool,
}

impl CreateOptions {
    /// Options from the resolved configuration; `recreate` picks whether the
    /// configured strategy applies
    pub fn from_config(config: &ToolConfig, recreate: bool) -> Self {
        Self {
            categories: config.categories.clone(),
            recreate: if recreate {
                config.recreate_strategy.into()
            } else {
                Recreate::No
            },
            install: config.install,
        }
    }
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self::from_config(&ToolConfig::default(), false)
    }
}

/// Result of a successful `new`
#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub handle: ProjectHandle,
    /// Logical names of the template files copied
    pub copied: Vec<String>,
    /// Environment, when installation ran
    pub env: Option<EnvHandle>,
}

/// Orchestrates project creation end to end
pub struct ProjectCreator<'a> {
    package_manager: &'a dyn PackageManager,
    materializer: TemplateMaterializer,
}

impl<'a> ProjectCreator<'a> {
    pub fn new(package_manager: &'a dyn PackageManager, materializer: TemplateMaterializer) -> Self {
        Self {
            package_manager,
            materializer,
        }
    }

    /// Create `root_path/project_name` with templates and manifest patches,
    /// then optionally install it.
    pub fn create(
        &self,
        root_path: &Utf8Path,
        project_name: &str,
        options: &CreateOptions,
    ) -> Result<CreatedProject> {
        let mut copied = Vec::new();

        let handle = ProjectInitializer::new(self.package_manager).create_with(
            root_path,
            project_name,
            options.recreate,
            |project| {
                let written = self.materializer.copy_templates(project, &options.categories)?;
                apply_standard_patches(project, &written)?;
                copied = written.into_iter().map(|t| t.logical_name).collect();
                Ok(())
            },
        )?;

        let env = if options.install {
            let bridge = Bridge::with_handle(self.package_manager, handle.clone());
            let env = bridge.create_environment()?;
            bridge.install(true)?;
            Some(env)
        } else {
            debug!("Skipping environment creation and install");
            None
        };

        info!("Project '{}' ready at {}", handle.name(), handle.root());
        Ok(CreatedProject {
            handle,
            copied,
            env,
        })
    }
}

/// Register what the copied templates need in `pyproject.toml`
fn apply_standard_patches(project: &ProjectHandle, copied: &[TemplateFile]) -> Result<()> {
    let has_entrypoint = copied
        .iter()
        .any(|t| t.destination == Destination::Package && t.logical_name == "__main__.py");
    if has_entrypoint {
        add_entrypoint_script(project)?;
    }

    if copied.iter().any(|t| t.category == "pytest") {
        add_pytest_config(project)?;
    }

    Ok(())
}

/// `<name> = "<package>.__main__:main"` under the manifest's scripts table
fn add_entrypoint_script(project: &ProjectHandle) -> Result<()> {
    let target = format!("{}.__main__:main", project.package_name());
    let manifest = Manifest::load(&project.manifest_path())?;

    if manifest.get("project").is_some() {
        add_item(project, "project", &nested_table(&["scripts"], project.name(), value(target)))
    } else {
        add_item(
            project,
            "tool",
            &nested_table(&["poetry", "scripts"], project.name(), value(target)),
        )
    }
}

fn add_pytest_config(project: &ProjectHandle) -> Result<()> {
    add_item(
        project,
        "tool",
        &nested_table(
            &["poetry", "group", "dev", "dependencies"],
            "pytest",
            value(PYTEST_REQUIREMENT),
        ),
    )?;

    let mut testpaths = Array::new();
    testpaths.push(crate::types::TESTS_DIR);
    add_item(
        project,
        "tool",
        &nested_table(&["pytest", "ini_options"], "testpaths", value(testpaths)),
    )
}
