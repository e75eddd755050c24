//! Core types for project management

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Name of the project manifest
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Name of the tests directory inside a project
pub const TESTS_DIR: &str = "tests";

/// An open handle on an existing project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    root: Utf8PathBuf,
    name: String,
}

impl ProjectHandle {
    /// Create a handle without touching the filesystem
    pub fn new(root: impl Into<Utf8PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    /// Open the project at `root`, reading its name from the manifest.
    ///
    /// Falls back to the directory name when the manifest carries neither
    /// `project.name` nor `tool.poetry.name`.
    pub fn open(root: &Utf8Path) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(Error::project_not_found(root.as_str()));
        }

        let manifest = Manifest::load(&manifest_path)?;
        let name = manifest
            .get_str("project.name")
            .or_else(|| manifest.get_str("tool.poetry.name"))
            .map(String::from)
            .or_else(|| root.file_name().map(String::from))
            .ok_or_else(|| Error::invalid_path(root.as_str()))?;

        Ok(Self::new(root, name))
    }

    /// Project root directory
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Project name as written in the manifest
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Importable package name
    pub fn package_name(&self) -> String {
        package_name(&self.name)
    }

    /// Path of `pyproject.toml`
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Whether the manifest exists
    pub fn has_manifest(&self) -> bool {
        self.manifest_path().is_file()
    }

    /// Source package directory (`src/<package>` for src layouts)
    pub fn package_dir(&self) -> Utf8PathBuf {
        let package = self.package_name();
        let src = self.root.join("src");
        if src.is_dir() {
            src.join(package)
        } else {
            self.root.join(package)
        }
    }

    /// Tests directory
    pub fn tests_dir(&self) -> Utf8PathBuf {
        self.root.join(TESTS_DIR)
    }
}

impl fmt::Display for ProjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.root)
    }
}

/// Virtual environment reported by the package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvHandle {
    pub path: Utf8PathBuf,
}

/// What `new` does when the project already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recreate {
    /// Fail with `AlreadyExists`
    #[default]
    No,
    /// Delete the old project, then scaffold
    DeleteFirst,
    /// Scaffold into a staging directory and swap on success
    Staged,
}

impl From<poetspen_core::RecreateStrategy> for Recreate {
    fn from(strategy: poetspen_core::RecreateStrategy) -> Self {
        match strategy {
            poetspen_core::RecreateStrategy::Staged => Self::Staged,
            poetspen_core::RecreateStrategy::DeleteFirst => Self::DeleteFirst,
        }
    }
}

/// Convert a project name into its importable package name
pub fn package_name(project_name: &str) -> String {
    project_name
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == '.' { '_' } else { c })
        .collect()
}

/// Validate a project name
pub fn validate_project_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(Error::invalid_project_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("My-App.core"), "my_app_core");
        assert_eq!(package_name("plain"), "plain");
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-app").is_ok());
        assert!(validate_project_name("app2.core_x").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-app").is_err());
        assert!(validate_project_name("my app").is_err());
        assert!(validate_project_name("../escape").is_err());
    }

    #[test]
    fn test_open_reads_name_from_manifest() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().join("checkout")).unwrap();
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(MANIFEST_FILE), "[tool.poetry]\nname = \"real-name\"\n").unwrap();

        let handle = ProjectHandle::open(&root).unwrap();
        assert_eq!(handle.name(), "real-name");
        assert_eq!(handle.package_name(), "real_name");
    }

    #[test]
    fn test_open_without_manifest() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert!(matches!(
            ProjectHandle::open(&root),
            Err(Error::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn test_package_dir_prefers_src_layout() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let handle = ProjectHandle::new(root.clone(), "demo-app");

        assert_eq!(handle.package_dir(), root.join("demo_app"));
        fs::create_dir(root.join("src")).unwrap();
        assert_eq!(handle.package_dir(), root.join("src").join("demo_app"));
    }
}
