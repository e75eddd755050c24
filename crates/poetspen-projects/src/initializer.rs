//! Project creation through the package manager.
//!
//! The package manager does the actual scaffolding (initial manifest and
//! source layout). This module guards the target path, handles `--recreate`
//! and opens the result.
//!
//! Two recreate modes exist. [`Recreate::DeleteFirst`] removes the existing
//! project before scaffolding, so a failed scaffold leaves nothing behind at
//! the target path. [`Recreate::Staged`] scaffolds next to the target and only
//! swaps the new tree in once every step succeeded.

use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use crate::types::{validate_project_name, ProjectHandle, Recreate, MANIFEST_FILE};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;
use tracing::{debug, info, warn};

const STAGING_PREFIX: &str = ".poetspen-staging-";
const RETIRED_PREFIX: &str = ".poetspen-retired-";

/// Creates projects via a [`PackageManager`]
pub struct ProjectInitializer<'a> {
    package_manager: &'a dyn PackageManager,
}

impl<'a> ProjectInitializer<'a> {
    pub fn new(package_manager: &'a dyn PackageManager) -> Self {
        Self { package_manager }
    }

    /// Create `root_path/project_name` and open it
    pub fn create(
        &self,
        root_path: &Utf8Path,
        project_name: &str,
        recreate: Recreate,
    ) -> Result<ProjectHandle> {
        self.create_with(root_path, project_name, recreate, |_| Ok(()))
    }

    /// Create `root_path/project_name`, run `finish` on the fresh project and
    /// return a handle on its final location.
    ///
    /// With [`Recreate::Staged`], `finish` runs inside the staging directory
    /// before the swap, so its failure also leaves the old project in place.
    pub fn create_with<F>(
        &self,
        root_path: &Utf8Path,
        project_name: &str,
        recreate: Recreate,
        finish: F,
    ) -> Result<ProjectHandle>
    where
        F: FnOnce(&ProjectHandle) -> Result<()>,
    {
        validate_project_name(project_name)?;

        let target = root_path.join(project_name);
        let exists = target.exists();

        if recreate == Recreate::No && target.join(MANIFEST_FILE).exists() {
            return Err(Error::already_exists(target.as_str()));
        }

        if recreate == Recreate::DeleteFirst && exists {
            warn!("Deleting existing project at {}", target);
            fs::remove_dir_all(&target)?;
        }

        fs::create_dir_all(root_path)?;

        if recreate == Recreate::Staged && exists {
            return self.create_staged(root_path, project_name, &target, finish);
        }

        let handle = self.scaffold(&target, project_name)?;
        finish(&handle)?;
        Ok(handle)
    }

    /// Scaffold into `path` and open the result
    fn scaffold(&self, path: &Utf8Path, project_name: &str) -> Result<ProjectHandle> {
        info!("Creating project '{}' at {}", project_name, path);

        if !self.package_manager.create_new_project(path, project_name)? {
            return Err(Error::external_tool_failure(
                format!("{} new", self.package_manager.name()),
                format!("could not create project '{}' at {}", project_name, path),
            ));
        }

        self.package_manager.open_project(path)
    }

    fn create_staged<F>(
        &self,
        root_path: &Utf8Path,
        project_name: &str,
        target: &Utf8Path,
        finish: F,
    ) -> Result<ProjectHandle>
    where
        F: FnOnce(&ProjectHandle) -> Result<()>,
    {
        let staging = temp_dir_in(root_path, STAGING_PREFIX)?;
        let staged_path = utf8(staging.path())?.join(project_name);
        debug!("Staging new project in {}", staged_path);

        let staged = self.scaffold(&staged_path, project_name)?;
        finish(&staged)?;

        swap_into_place(root_path, &staged_path, target)?;
        info!("Replaced existing project at {}", target);

        self.package_manager.open_project(target)
    }
}

/// Move `target` aside, move `staged` into its place, then drop the old tree.
///
/// If the second rename fails the old tree is moved back.
fn swap_into_place(root_path: &Utf8Path, staged: &Utf8Path, target: &Utf8Path) -> Result<()> {
    let retired = temp_dir_in(root_path, RETIRED_PREFIX)?;
    let retired_path = utf8(retired.path())?.join("project");

    fs::rename(target, &retired_path)?;
    if let Err(e) = fs::rename(staged, target) {
        warn!("Swap failed, restoring {}: {}", target, e);
        fs::rename(&retired_path, target)?;
        return Err(e.into());
    }

    Ok(())
}

fn temp_dir_in(dir: &Utf8Path, prefix: &str) -> Result<TempDir> {
    Ok(tempfile::Builder::new().prefix(prefix).tempdir_in(dir)?)
}

fn utf8(path: &std::path::Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| Error::invalid_path(p.display().to_string()))
}
