//! Error types for poetspen-projects

use thiserror::Error;

/// Result type alias using poetspen-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project management error types
#[derive(Error, Debug)]
pub enum Error {
    /// Project already exists
    #[error("Project already exists at: {path}")]
    AlreadyExists { path: String },

    /// No manifest at the given location
    #[error("Project not found (no pyproject.toml) at: {path}")]
    ProjectNotFound { path: String },

    /// Invalid project name
    #[error("Invalid project name: {name}. Must start with a letter or digit and contain only letters, digits, '-', '_' or '.'")]
    InvalidProjectName { name: String },

    /// External package manager reported failure
    #[error("{tool} failed: {message}")]
    ExternalToolFailure { tool: String, message: String },

    /// External package manager not installed
    #[error("Required command not found: {command}. Please ensure it is installed and in PATH")]
    ToolNotFound { command: String },

    /// Manifest is not valid TOML
    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: String,
        #[source]
        source: toml_edit::TomlError,
    },

    /// Manifest key holds a value of the wrong shape
    #[error("Manifest key '{key}' is not a table")]
    ManifestConflict { key: String },

    /// Template file name or location not understood
    #[error("Invalid template {path}: {message}")]
    InvalidTemplate { path: String, message: String },

    /// Invalid path
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] poetspen_core::Error),
}

impl Error {
    /// Create a project exists error
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Create a project not found error
    pub fn project_not_found(path: impl Into<String>) -> Self {
        Self::ProjectNotFound { path: path.into() }
    }

    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>) -> Self {
        Self::InvalidProjectName { name: name.into() }
    }

    /// Create an external tool failure error
    pub fn external_tool_failure(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalToolFailure {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a tool not found error
    pub fn tool_not_found(command: impl Into<String>) -> Self {
        Self::ToolNotFound {
            command: command.into(),
        }
    }

    /// Create a manifest conflict error
    pub fn manifest_conflict(key: impl Into<String>) -> Self {
        Self::ManifestConflict { key: key.into() }
    }

    /// Create an invalid template error
    pub fn invalid_template(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }
}
