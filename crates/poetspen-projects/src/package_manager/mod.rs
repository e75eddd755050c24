//! External package-manager service
//!
//! Dependency resolution, virtual environments and lock files belong to the
//! package manager. This crate only talks to it through [`PackageManager`],
//! so tests can substitute a recording fake for the real `poetry` binary.

mod poetry;

pub use poetry::PoetryCli;

use crate::error::Result;
use crate::types::{EnvHandle, ProjectHandle};
use camino::Utf8Path;

/// Operations delegated to the external package manager.
///
/// Every call blocks until the underlying tool exits.
pub trait PackageManager {
    /// Tool name used in logs and errors
    fn name(&self) -> &str;

    /// Scaffold a new project named `name` at `path`.
    ///
    /// Returns `Ok(false)` when the tool ran and reported failure.
    fn create_new_project(&self, path: &Utf8Path, name: &str) -> Result<bool>;

    /// Open an existing project at `path`
    fn open_project(&self, path: &Utf8Path) -> Result<ProjectHandle>;

    /// Create (or reuse) the project's virtual environment
    fn create_environment(&self, handle: &ProjectHandle) -> Result<EnvHandle>;

    /// Install dependencies, refreshing the resolution first when `update` is set
    fn install(&self, handle: &ProjectHandle, update: bool) -> Result<()>;

    /// Run `args` inside the project's environment, returning the exit code
    fn run(&self, handle: &ProjectHandle, args: &[String]) -> Result<i32>;

    /// Invoke `command args...` on the tool itself, returning the exit code
    fn passthrough(&self, handle: &ProjectHandle, command: &str, args: &[String]) -> Result<i32>;
}
