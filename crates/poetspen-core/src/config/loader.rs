//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Global config (`<config dir>/poetspen/config.yaml`)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (POETSPEN_* prefix)
//! 5. CLI flags (handled by caller)

use super::types::{RecreateStrategy, ToolConfig, ToolConfigOverlay};
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/"]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "defaults.yaml";
const GLOBAL_CONFIG_FILE: &str = "config.yaml";

/// Configuration hierarchy loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory holding the global config file
    config_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at the platform config directory
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine config directory"))?;
        let base = Utf8PathBuf::from_path_buf(base).map_err(|p| {
            Error::invalid_config(format!("Config directory is not valid UTF-8: {:?}", p))
        })?;

        Ok(Self {
            config_dir: base.join("poetspen"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load the tool configuration, layering an optional explicit file
    pub fn load(&self, explicit: Option<&Utf8Path>) -> Result<ToolConfig> {
        let mut config = Self::load_embedded_defaults()?;

        let global_path = self.config_dir.join(GLOBAL_CONFIG_FILE);
        if global_path.exists() {
            debug!("Loading global config from {}", global_path);
            let overlay = Self::load_overlay(&global_path)?;
            config = Self::merge(config, overlay);
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            debug!("Loading config from {}", path);
            let overlay = Self::load_overlay(path)?;
            config = Self::merge(config, overlay);
        }

        Self::apply_env_overrides(config)
    }

    fn load_embedded_defaults() -> Result<ToolConfig> {
        let embedded = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    fn load_overlay(path: &Utf8Path) -> Result<ToolConfigOverlay> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(ToolConfigOverlay::default());
        }
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Merge a layer over a resolved config (fields set in the overlay win)
    fn merge(mut base: ToolConfig, overlay: ToolConfigOverlay) -> ToolConfig {
        if let Some(bin) = overlay.poetry_bin {
            base.poetry_bin = bin;
        }
        if overlay.python.is_some() {
            base.python = overlay.python;
        }
        if overlay.template_dir.is_some() {
            base.template_dir = overlay.template_dir;
        }
        if let Some(categories) = overlay.categories {
            base.categories = categories;
        }
        if let Some(strategy) = overlay.recreate_strategy {
            base.recreate_strategy = strategy;
        }
        if let Some(install) = overlay.install {
            base.install = install;
        }
        base
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: ToolConfig) -> Result<ToolConfig> {
        if let Ok(val) = env::var("POETSPEN_POETRY_BIN") {
            config.poetry_bin = val;
        }

        if let Ok(val) = env::var("POETSPEN_PYTHON") {
            config.python = Some(val);
        }

        if let Ok(val) = env::var("POETSPEN_TEMPLATE_DIR") {
            config.template_dir = Some(Utf8PathBuf::from(val));
        }

        if let Ok(val) = env::var("POETSPEN_CATEGORIES") {
            config.categories = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(val) = env::var("POETSPEN_RECREATE_STRATEGY") {
            config.recreate_strategy = val
                .parse::<RecreateStrategy>()
                .map_err(|e| Error::invalid_config(format!("POETSPEN_RECREATE_STRATEGY: {}", e)))?;
        }

        if let Ok(val) = env::var("POETSPEN_INSTALL") {
            config.install = val.parse().map_err(|_| {
                Error::invalid_config("POETSPEN_INSTALL must be 'true' or 'false'")
            })?;
        }

        Ok(config)
    }
}
