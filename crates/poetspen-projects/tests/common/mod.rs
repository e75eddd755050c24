//! Shared fixtures for poetspen-projects integration tests

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use poetspen_projects::types::package_name;
use poetspen_projects::{EnvHandle, PackageManager, ProjectHandle, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Records every call and scaffolds a minimal Poetry-style project
#[derive(Default)]
pub struct FakePackageManager {
    pub calls: RefCell<Vec<String>>,
    pub fail_create: bool,
    pub src_layout: bool,
}

impl FakePackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn pyproject(name: &str) -> String {
    format!(
        r#"[tool.poetry]
name = "{name}"
version = "0.1.0"
description = ""  # filled in later

[tool.poetry.dependencies]
python = "^3.11"

[build-system]
requires = ["poetry-core"]
build-backend = "poetry.core.masonry.api"
"#
    )
}

impl PackageManager for FakePackageManager {
    fn name(&self) -> &str {
        "fake-poetry"
    }

    fn create_new_project(&self, path: &Utf8Path, name: &str) -> Result<bool> {
        self.record(format!("new {}", name));
        if self.fail_create {
            return Ok(false);
        }

        let package_root = if self.src_layout {
            path.join("src")
        } else {
            path.to_owned()
        };
        let package = package_root.join(package_name(name));
        fs::create_dir_all(&package)?;
        fs::write(package.join("__init__.py"), "")?;
        fs::create_dir_all(path.join("tests"))?;
        fs::write(path.join("tests").join("__init__.py"), "")?;
        fs::write(path.join("pyproject.toml"), pyproject(name))?;
        Ok(true)
    }

    fn open_project(&self, path: &Utf8Path) -> Result<ProjectHandle> {
        self.record("open".to_string());
        ProjectHandle::open(path)
    }

    fn create_environment(&self, handle: &ProjectHandle) -> Result<EnvHandle> {
        self.record("env".to_string());
        Ok(EnvHandle {
            path: handle.root().join(".venv"),
        })
    }

    fn install(&self, _handle: &ProjectHandle, update: bool) -> Result<()> {
        self.record(format!("install update={}", update));
        Ok(())
    }

    fn run(&self, _handle: &ProjectHandle, args: &[String]) -> Result<i32> {
        self.record(format!("run {}", args.join(" ")).trim_end().to_string());
        Ok(0)
    }

    fn passthrough(&self, _handle: &ProjectHandle, command: &str, args: &[String]) -> Result<i32> {
        self.record(format!("{} {}", command, args.join(" ")).trim_end().to_string());
        Ok(0)
    }
}

/// A temporary directory with a UTF-8 path
pub fn utf8_temp() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("Invalid UTF-8 path");
    (temp, path)
}

/// Every file under `root` with its bytes, keyed by relative path
pub fn snapshot(root: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_string_lossy().into_owned();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
