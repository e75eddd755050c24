//! Poetry driven as a child process

use super::PackageManager;
use crate::error::{Error, Result};
use crate::types::{EnvHandle, ProjectHandle};
use camino::{Utf8Path, Utf8PathBuf};
use poetspen_core::ToolConfig;
use std::path::Path;
use std::process::Output;
use tracing::{debug, info, warn};

/// Default interpreter for `poetry env use`
const DEFAULT_PYTHON: &str = "python3";

/// [`PackageManager`] backed by the `poetry` executable
#[derive(Debug, Clone)]
pub struct PoetryCli {
    bin: String,
    python: Option<String>,
}

impl PoetryCli {
    /// Use the `poetry` found on PATH
    pub fn new() -> Self {
        Self {
            bin: "poetry".to_string(),
            python: None,
        }
    }

    /// Build from the resolved tool configuration
    pub fn from_config(config: &ToolConfig) -> Self {
        Self {
            bin: config.poetry_bin.clone(),
            python: config.python.clone(),
        }
    }

    /// Use a specific executable
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Interpreter handed to `poetry env use`
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = Some(python.into());
        self
    }

    /// Executable this instance invokes
    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// Check the executable resolves on PATH
    pub fn ensure_available(&self) -> Result<()> {
        which::which(&self.bin)
            .map(|path| debug!("Using {} at {}", self.bin, path.display()))
            .map_err(|_| Error::tool_not_found(&self.bin))
    }

    /// Run with captured output; non-zero exit is returned, not raised
    fn capture(&self, dir: &Path, args: &[String]) -> Result<Output> {
        self.ensure_available()?;
        debug!("Running: {} {} (in {})", self.bin, args.join(" "), dir.display());

        let output = duct::cmd(self.bin.as_str(), args)
            .dir(dir)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("{}: {}", self.bin, line);
        }

        Ok(output)
    }

    /// Run with captured output, turning a non-zero exit into an error
    fn capture_checked(&self, dir: &Path, args: &[String]) -> Result<Output> {
        let output = self.capture(dir, args)?;
        if output.status.success() {
            return Ok(output);
        }
        Err(Error::external_tool_failure(
            format!("{} {}", self.bin, args.first().map(String::as_str).unwrap_or("")),
            failure_message(&output),
        ))
    }

    /// Run attached to the terminal and hand back the exit code
    fn interactive(&self, dir: &Path, args: &[String]) -> Result<i32> {
        self.ensure_available()?;
        debug!("Running: {} {} (in {})", self.bin, args.join(" "), dir.display());

        let output = duct::cmd(self.bin.as_str(), args)
            .dir(dir)
            .unchecked()
            .run()?;

        Ok(output.status.code().unwrap_or(1))
    }
}

impl Default for PoetryCli {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageManager for PoetryCli {
    fn name(&self) -> &str {
        &self.bin
    }

    fn create_new_project(&self, path: &Utf8Path, name: &str) -> Result<bool> {
        // Runs in the parent, so the target is named relative to it
        let parent = path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir_name = path
            .file_name()
            .ok_or_else(|| Error::invalid_path(path.as_str()))?;
        let args = strings(["new", "--name", name, dir_name]);

        let output = self.capture(parent.as_std_path(), &args)?;
        if !output.status.success() {
            warn!("{} new failed: {}", self.bin, failure_message(&output));
            return Ok(false);
        }

        info!("Created project '{}' at {}", name, path);
        Ok(true)
    }

    fn open_project(&self, path: &Utf8Path) -> Result<ProjectHandle> {
        ProjectHandle::open(path)
    }

    fn create_environment(&self, handle: &ProjectHandle) -> Result<EnvHandle> {
        let dir = handle.root().as_std_path();
        let python = self.python.as_deref().unwrap_or(DEFAULT_PYTHON);

        self.capture_checked(dir, &strings(["env", "use", python]))?;
        let output = self.capture_checked(dir, &strings(["env", "info", "--path"]))?;

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            return Err(Error::external_tool_failure(
                format!("{} env info", self.bin),
                "no environment path reported",
            ));
        }

        info!("Using env: {}", path);
        Ok(EnvHandle {
            path: Utf8PathBuf::from(path),
        })
    }

    fn install(&self, handle: &ProjectHandle, update: bool) -> Result<()> {
        let command = if update { "update" } else { "install" };
        self.capture_checked(
            handle.root().as_std_path(),
            &strings([command, "--no-interaction"]),
        )?;
        Ok(())
    }

    fn run(&self, handle: &ProjectHandle, args: &[String]) -> Result<i32> {
        let mut full = vec!["run".to_string()];
        if args.is_empty() {
            full.extend(strings(["python", "-m"]));
            full.push(handle.package_name());
        } else {
            full.extend(args.iter().cloned());
        }
        self.interactive(handle.root().as_std_path(), &full)
    }

    fn passthrough(&self, handle: &ProjectHandle, command: &str, args: &[String]) -> Result<i32> {
        let mut full = vec![command.to_string()];
        full.extend(args.iter().cloned());
        self.interactive(handle.root().as_std_path(), &full)
    }
}

fn strings<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Prefer stderr, fall back to stdout, then to the exit status
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("exited with {}", output.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let poetry = PoetryCli::new().with_bin("poetspen-no-such-poetry");
        let handle = ProjectHandle::new("/tmp", "demo");
        assert!(matches!(
            poetry.install(&handle, false),
            Err(Error::ToolNotFound { command }) if command == "poetspen-no-such-poetry"
        ));
    }

    // Fake scripts run #[serial]: exec'ing a file another thread's fork still
    // holds open for writing fails with ETXTBSY.
    #[cfg(unix)]
    fn fake_poetry(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("poetry");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_passthrough_returns_exit_code() {
        let temp = TempDir::new().unwrap();
        let bin = fake_poetry(temp.path(), "echo \"$@\" > args.txt\nexit 3");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let poetry = PoetryCli::new().with_bin(bin);

        let code = poetry
            .passthrough(
                &ProjectHandle::new(root.clone(), "demo"),
                "show",
                &["--tree".to_string()],
            )
            .unwrap();

        assert_eq!(code, 3);
        assert_eq!(
            fs::read_to_string(root.join("args.txt")).unwrap().trim(),
            "show --tree"
        );
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_install_failure_carries_stderr() {
        let temp = TempDir::new().unwrap();
        let bin = fake_poetry(temp.path(), "echo 'lock file is stale' >&2\nexit 1");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let poetry = PoetryCli::new().with_bin(bin);

        match poetry.install(&ProjectHandle::new(root, "demo"), false) {
            Err(Error::ExternalToolFailure { message, .. }) => {
                assert_eq!(message, "lock file is stale")
            }
            other => panic!("Expected ExternalToolFailure, got: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_create_environment_reads_path() {
        let temp = TempDir::new().unwrap();
        let bin = fake_poetry(
            temp.path(),
            "if [ \"$2\" = \"info\" ]; then echo /venvs/demo-py3.12; fi",
        );
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let poetry = PoetryCli::new().with_bin(bin).with_python("python3.12");

        let env = poetry
            .create_environment(&ProjectHandle::new(root, "demo"))
            .unwrap();
        assert_eq!(env.path, Utf8PathBuf::from("/venvs/demo-py3.12"));
    }

    /// Logs `$PWD` and argv, then scaffolds a minimal project at `$4`
    #[cfg(unix)]
    fn fake_poetry_new(dir: &Path) -> String {
        let body = format!(
            r#"echo "$PWD" > {log}/pwd.txt
echo "$@" > {log}/args.txt
mkdir -p "$4"
printf '[tool.poetry]\nname = "%s"\n' "$3" > "$4/pyproject.toml""#,
            log = dir.display()
        );
        fake_poetry(dir, &body)
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_create_new_project_runs_in_parent() {
        let temp = TempDir::new().unwrap();
        let bin = fake_poetry_new(temp.path());
        let root = Utf8PathBuf::from_path_buf(temp.path().join("work")).unwrap();
        fs::create_dir_all(&root).unwrap();
        let poetry = PoetryCli::new().with_bin(bin);

        assert!(poetry.create_new_project(&root.join("demo"), "demo").unwrap());

        let pwd = fs::read_to_string(temp.path().join("pwd.txt")).unwrap();
        assert_eq!(
            fs::canonicalize(pwd.trim()).unwrap(),
            fs::canonicalize(&root).unwrap()
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("args.txt")).unwrap().trim(),
            "new --name demo demo"
        );
        assert!(root.join("demo").join("pyproject.toml").is_file());
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_initializer_with_relative_root() {
        use crate::initializer::ProjectInitializer;
        use crate::types::Recreate;

        let temp = TempDir::new().unwrap();
        let bin = fake_poetry_new(temp.path());
        let poetry = PoetryCli::new().with_bin(bin);

        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        let result =
            ProjectInitializer::new(&poetry).create(Utf8Path::new("sub"), "demo", Recreate::No);
        std::env::set_current_dir(original).unwrap();

        let handle = result.unwrap();
        assert_eq!(handle.name(), "demo");
        assert!(temp.path().join("sub/demo/pyproject.toml").is_file());
        assert!(!temp.path().join("sub/sub").exists());
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_run_without_args_runs_package_module() {
        let temp = TempDir::new().unwrap();
        let bin = fake_poetry(temp.path(), "echo \"$@\" > args.txt");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let poetry = PoetryCli::new().with_bin(bin);

        let code = poetry
            .run(&ProjectHandle::new(root.clone(), "demo-app"), &[])
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(root.join("args.txt")).unwrap().trim(),
            "run python -m demo_app"
        );
    }
}
