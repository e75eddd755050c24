//! # poetspen-projects
//!
//! Project management library for the poetspen CLI providing:
//! - Project creation through an external package manager (Poetry)
//! - Boilerplate template copying
//! - Format-preserving `pyproject.toml` patching
//! - Install/run forwarding to the package manager
//!
//! Dependency resolution, virtual environments and lock files are never
//! handled here; they stay behind the [`PackageManager`] trait.
//!
//! # Examples
//!
//! ## Create a project
//!
//! ```no_run
//! use poetspen_projects::{CreateOptions, PoetryCli, ProjectCreator, TemplateMaterializer};
//! use camino::Utf8Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let poetry = PoetryCli::new();
//! let creator = ProjectCreator::new(&poetry, TemplateMaterializer::default());
//! let created = creator.create(Utf8Path::new("/work"), "demo", &CreateOptions::default())?;
//! println!("copied {:?}", created.copied);
//! # Ok(())
//! # }
//! ```
//!
//! ## Patch the manifest
//!
//! ```no_run
//! use poetspen_projects::manifest::{add_item, nested_table};
//! use poetspen_projects::ProjectHandle;
//! use camino::Utf8Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let project = ProjectHandle::open(Utf8Path::new("/work/demo"))?;
//! let patch = nested_table(&["poetry", "scripts"], "demo", toml_edit::value("demo:main"));
//! add_item(&project, "tool", &patch)?;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod creator;
pub mod error;
pub mod initializer;
pub mod manifest;
pub mod package_manager;
pub mod templates;
pub mod types;

pub use bridge::Bridge;
pub use creator::{CreateOptions, CreatedProject, ProjectCreator};
pub use error::{Error, Result};
pub use initializer::ProjectInitializer;
pub use manifest::Manifest;
pub use package_manager::{PackageManager, PoetryCli};
pub use templates::{TemplateMaterializer, TemplateSource};
pub use types::{EnvHandle, ProjectHandle, Recreate};
