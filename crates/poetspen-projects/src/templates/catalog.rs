//! Template enumeration from the embedded set or a directory on disk.
//!
//! A template's category label is the last dot-separated segment before the
//! extension: `conftest.pytest.py` is `conftest.py` in category `pytest`,
//! `.gitignore.default` is `.gitignore` in category `default`. Files without a
//! label are not templates.

use crate::error::{Error, Result};
use crate::types::ProjectHandle;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use std::fmt;
use std::fs;
use tracing::warn;
use walkdir::WalkDir;

/// Templates compiled into the binary
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct EmbeddedTemplates;

/// Where a template lands inside a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Destination {
    /// The project's tests directory
    Tests,
    /// The project's source package directory
    Package,
    /// The project root
    Root,
}

impl Destination {
    fn from_dir(name: &str) -> Self {
        match name {
            "tests" => Self::Tests,
            "package" => Self::Package,
            _ => Self::Root,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tests => write!(f, "tests"),
            Self::Package => write!(f, "<package>"),
            Self::Root => write!(f, "."),
        }
    }
}

/// One template file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path inside the template tree
    pub relative_path: Utf8PathBuf,
    /// File name once copied
    pub logical_name: String,
    /// Category label
    pub category: String,
    /// Target directory kind
    pub destination: Destination,
    /// Directories between the destination and the file
    pub subdir: Utf8PathBuf,
}

impl TemplateFile {
    /// Parse a path relative to the template root.
    ///
    /// Returns `None` when the file name carries no category label.
    pub fn parse(relative_path: &Utf8Path) -> Option<Self> {
        let file_name = relative_path.file_name()?;
        let (logical_name, category) = split_label(file_name)?;

        let parent = relative_path.parent().unwrap_or_else(|| Utf8Path::new(""));
        let mut components = parent.components();
        let (destination, subdir) = match components.next() {
            Some(first) => match Destination::from_dir(first.as_str()) {
                Destination::Root => (Destination::Root, parent.to_owned()),
                dest => (dest, components.as_path().to_owned()),
            },
            None => (Destination::Root, Utf8PathBuf::new()),
        };

        Some(Self {
            relative_path: relative_path.to_owned(),
            logical_name,
            category,
            destination,
            subdir,
        })
    }

    /// Destination relative to its directory kind
    pub fn destination_key(&self) -> (Destination, Utf8PathBuf) {
        (self.destination, self.subdir.join(&self.logical_name))
    }

    /// Absolute destination inside `project`
    pub fn destination_in(&self, project: &ProjectHandle) -> Utf8PathBuf {
        let base = match self.destination {
            Destination::Tests => project.tests_dir(),
            Destination::Package => project.package_dir(),
            Destination::Root => project.root().to_owned(),
        };
        base.join(&self.subdir).join(&self.logical_name)
    }
}

impl fmt::Display for TemplateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (dest, path) = self.destination_key();
        write!(f, "{}/{}", dest, path)
    }
}

/// Split `stem.category.ext` / `name.category` into logical name and label
fn split_label(file_name: &str) -> Option<(String, String)> {
    let (prefix, body) = match file_name.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", file_name),
    };

    let segments: Vec<&str> = body.split('.').collect();
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    let label_index = if segments.len() == 2 { 1 } else { segments.len() - 2 };
    let category = segments[label_index].to_string();
    let logical: Vec<&str> = segments
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_index)
        .map(|(_, s)| *s)
        .collect();

    Some((format!("{}{}", prefix, logical.join(".")), category))
}

/// Where templates are read from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// The set compiled into the binary
    #[default]
    Embedded,
    /// A template tree on disk
    Directory(Utf8PathBuf),
}

impl TemplateSource {
    /// Pick the directory when configured, else the embedded set
    pub fn from_dir(dir: Option<Utf8PathBuf>) -> Self {
        dir.map(Self::Directory).unwrap_or_default()
    }

    /// All templates, sorted by relative path
    pub fn list(&self) -> Result<Vec<TemplateFile>> {
        let mut paths = match self {
            Self::Embedded => EmbeddedTemplates::iter()
                .map(|p| Utf8PathBuf::from(p.as_ref()))
                .collect::<Vec<_>>(),
            Self::Directory(root) => list_directory(root)?,
        };
        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in paths {
            match TemplateFile::parse(&path) {
                Some(template) => templates.push(template),
                None => warn!("Skipping template without a category label: {}", path),
            }
        }
        Ok(templates)
    }

    /// Raw bytes of a template
    pub fn read(&self, template: &TemplateFile) -> Result<Vec<u8>> {
        match self {
            Self::Embedded => EmbeddedTemplates::get(template.relative_path.as_str())
                .map(|file| file.data.into_owned())
                .ok_or_else(|| {
                    Error::invalid_template(
                        template.relative_path.as_str(),
                        "not found in embedded templates",
                    )
                }),
            Self::Directory(root) => Ok(fs::read(root.join(&template.relative_path))?),
        }
    }
}

fn list_directory(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !root.is_dir() {
        return Err(Error::invalid_path(root.as_str()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| Error::invalid_template(root.as_str(), e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root.as_std_path())
            .map_err(|e| Error::invalid_template(entry.path().display().to_string(), e.to_string()))?;
        let relative = Utf8Path::from_path(relative).ok_or_else(|| {
            Error::invalid_template(entry.path().display().to_string(), "path is not valid UTF-8")
        })?;
        paths.push(relative.to_owned());
    }
    Ok(paths)
}
