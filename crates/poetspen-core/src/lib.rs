//! # poetspen-core
//!
//! Core library for the poetspen CLI providing:
//! - Hierarchical configuration loading (embedded defaults, files, environment)
//! - Shared configuration types

pub mod config;
pub mod error;

pub use config::{ConfigLoader, RecreateStrategy, ToolConfig};
pub use error::{Error, Result};
