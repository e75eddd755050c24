//! Install/run bridge onto the package manager for an existing project

use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use crate::types::{EnvHandle, ProjectHandle, MANIFEST_FILE};
use camino::Utf8Path;
use tracing::{debug, info};

const NO_INTERACTION: &str = "--no-interaction";

/// One-shot operations against an open project
pub struct Bridge<'a> {
    package_manager: &'a dyn PackageManager,
    handle: ProjectHandle,
}

impl<'a> Bridge<'a> {
    /// Open the project at `path`.
    ///
    /// Fails with `ProjectNotFound` when there is no manifest, without
    /// calling the package manager.
    pub fn setup(package_manager: &'a dyn PackageManager, path: &Utf8Path) -> Result<Self> {
        if !path.join(MANIFEST_FILE).is_file() {
            return Err(Error::project_not_found(path.as_str()));
        }

        let handle = package_manager.open_project(path)?;
        debug!("Opened project {}", handle);
        Ok(Self::with_handle(package_manager, handle))
    }

    /// Wrap an already open handle
    pub fn with_handle(package_manager: &'a dyn PackageManager, handle: ProjectHandle) -> Self {
        Self {
            package_manager,
            handle,
        }
    }

    /// The open project
    pub fn handle(&self) -> &ProjectHandle {
        &self.handle
    }

    /// Create or reuse the project's virtual environment
    pub fn create_environment(&self) -> Result<EnvHandle> {
        self.ensure_manifest()?;
        self.package_manager.create_environment(&self.handle)
    }

    /// Install dependencies; `update` refreshes the resolution first
    pub fn install(&self, update: bool) -> Result<()> {
        self.ensure_manifest()?;
        info!(
            "{} dependencies for {}",
            if update { "Updating" } else { "Installing" },
            self.handle.name()
        );
        self.package_manager.install(&self.handle, update)
    }

    /// Run inside the project environment and return the child's exit code.
    ///
    /// With no `args` the project package is run as a module.
    pub fn run(&self, args: &[String]) -> Result<i32> {
        self.ensure_manifest()?;
        self.package_manager.run(&self.handle, args)
    }

    /// Forward `cmd args...` to the package manager.
    ///
    /// `managed` adds `--no-interaction` so the tool never blocks on a
    /// prompt; otherwise arguments go through verbatim.
    pub fn poetry_command(&self, cmd: &str, args: &[String], managed: bool) -> Result<i32> {
        self.ensure_manifest()?;
        let args = if managed {
            managed_args(args)
        } else {
            args.to_vec()
        };
        self.package_manager.passthrough(&self.handle, cmd, &args)
    }

    fn ensure_manifest(&self) -> Result<()> {
        if self.handle.has_manifest() {
            Ok(())
        } else {
            Err(Error::project_not_found(self.handle.root().as_str()))
        }
    }
}

fn managed_args(args: &[String]) -> Vec<String> {
    let mut out = args.to_vec();
    if !args.iter().any(|a| a == NO_INTERACTION || a == "-n") {
        out.push(NO_INTERACTION.to_string());
    }
    out
}
