//! Configuration types for poetspen
//!
//! `ToolConfig` is the fully resolved configuration. `ToolConfigOverlay` is
//! what a single layer (a YAML file) may set; every field is optional so a
//! layer only overrides what it names.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How `new --recreate` replaces an existing project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecreateStrategy {
    /// Scaffold into a staging directory and swap it in on success
    #[default]
    Staged,
    /// Delete the existing project before scaffolding
    DeleteFirst,
}

impl RecreateStrategy {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staged => "staged",
            Self::DeleteFirst => "delete-first",
        }
    }
}

impl fmt::Display for RecreateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecreateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staged" => Ok(Self::Staged),
            "delete-first" | "delete_first" => Ok(Self::DeleteFirst),
            other => Err(format!(
                "unknown recreate strategy '{}', expected 'staged' or 'delete-first'",
                other
            )),
        }
    }
}

/// Fully resolved poetspen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolConfig {
    /// Poetry executable name or path
    #[serde(default = "default_poetry_bin")]
    pub poetry_bin: String,

    /// Interpreter handed to `poetry env use`
    #[serde(default)]
    pub python: Option<String>,

    /// Template directory on disk, replacing the embedded set
    #[serde(default)]
    pub template_dir: Option<Utf8PathBuf>,

    /// Template categories, highest priority first
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Replacement strategy for `new --recreate`
    #[serde(default)]
    pub recreate_strategy: RecreateStrategy,

    /// Create the environment and install after `new`
    #[serde(default = "default_install")]
    pub install: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            poetry_bin: default_poetry_bin(),
            python: None,
            template_dir: None,
            categories: default_categories(),
            recreate_strategy: RecreateStrategy::default(),
            install: default_install(),
        }
    }
}

/// A single configuration layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolConfigOverlay {
    #[serde(default)]
    pub poetry_bin: Option<String>,
    #[serde(default)]
    pub python: Option<String>,
    #[serde(default)]
    pub template_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub recreate_strategy: Option<RecreateStrategy>,
    #[serde(default)]
    pub install: Option<bool>,
}

fn default_poetry_bin() -> String {
    "poetry".to_string()
}

fn default_categories() -> Vec<String> {
    vec!["default".to_string(), "pytest".to_string()]
}

fn default_install() -> bool {
    true
}
