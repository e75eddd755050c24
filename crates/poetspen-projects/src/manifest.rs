//! Format-preserving `pyproject.toml` editing.
//!
//! The manifest is meant to be hand-edited, so every write goes through a
//! `toml_edit::DocumentMut` that keeps comments, whitespace and key order of
//! everything the patch does not touch. Patches are deep-merged: tables are
//! merged key by key at every level and only leaf values are replaced.

use crate::error::{Error, Result};
use crate::types::ProjectHandle;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::fs;
use toml_edit::{DocumentMut, Item, Table, TableLike, Value};
use tracing::debug;

/// A parsed manifest bound to its location on disk
#[derive(Debug, Clone)]
pub struct Manifest {
    path: Utf8PathBuf,
    doc: DocumentMut,
}

impl Manifest {
    /// Read and parse the manifest at `path`
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse manifest text that belongs to `path`
    pub fn parse(path: &Utf8Path, content: &str) -> Result<Self> {
        let doc = content
            .parse::<DocumentMut>()
            .map_err(|source| Error::ManifestParse {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            path: path.to_owned(),
            doc,
        })
    }

    /// Location of the manifest
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Look up an item by dotted path, e.g. `tool.poetry.name`
    pub fn get(&self, dotted: &str) -> Option<&Item> {
        let mut segments = dotted.split('.');
        let mut item = self.doc.get(segments.next()?)?;
        for segment in segments {
            item = item.as_table_like()?.get(segment)?;
        }
        Some(item)
    }

    /// Look up a string value by dotted path
    pub fn get_str(&self, dotted: &str) -> Option<&str> {
        self.get(dotted)?.as_str()
    }

    /// Deep-merge `value` under `top_level_key`.
    ///
    /// Returns whether the document changed.
    pub fn merge(&mut self, top_level_key: &str, value: &Table) -> Result<bool> {
        let root = self.doc.as_table_mut();

        if !root.contains_key(top_level_key) {
            let mut table = value.clone();
            mark_implicit(&mut table);
            root.insert(top_level_key, Item::Table(table));
            return Ok(true);
        }

        let target = root
            .get_mut(top_level_key)
            .and_then(|item| item.as_table_like_mut())
            .ok_or_else(|| Error::manifest_conflict(top_level_key))?;

        merge_table(target, value, top_level_key)
    }

    /// Write the whole document back to its path
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.doc.to_string())?;
        Ok(())
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc)
    }
}

/// Merge `value` into the manifest table `top_level_key` of `project` and
/// write it back.
pub fn add_item(project: &ProjectHandle, top_level_key: &str, value: &Table) -> Result<()> {
    let mut manifest = Manifest::load(&project.manifest_path())?;

    if manifest.merge(top_level_key, value)? {
        debug!("Updating [{}] in {}", top_level_key, manifest.path());
        manifest.save()?;
    } else {
        debug!("[{}] already up to date in {}", top_level_key, manifest.path());
    }

    Ok(())
}

/// Build a table holding `value` at `key` beneath the nested `path`.
///
/// `nested_table(&["poetry", "scripts"], "app", value("app:main"))` is the
/// patch for `[tool.poetry.scripts] app = "app:main"` when merged under
/// `tool`.
pub fn nested_table(path: &[&str], key: &str, value: impl Into<Item>) -> Table {
    let mut leaf = Table::new();
    leaf.insert(key, value.into());

    path.iter().rev().fold(leaf, |inner, segment| {
        let mut outer = Table::new();
        outer.insert(segment, Item::Table(inner));
        outer
    })
}

fn merge_table(target: &mut dyn TableLike, patch: &dyn TableLike, at: &str) -> Result<bool> {
    let mut changed = false;

    for (key, incoming) in patch.iter() {
        let dotted = format!("{}.{}", at, key);

        if let Some(existing) = target.get_mut(key) {
            changed |= merge_item(existing, incoming, &dotted)?;
            continue;
        }

        let mut item = incoming.clone();
        if let Item::Table(table) = &mut item {
            mark_implicit(table);
        }
        target.insert(key, item);
        changed = true;
    }

    Ok(changed)
}

fn merge_item(existing: &mut Item, incoming: &Item, at: &str) -> Result<bool> {
    match (existing.is_table_like(), incoming.is_table_like()) {
        (true, true) => {
            let (Some(target), Some(patch)) =
                (existing.as_table_like_mut(), incoming.as_table_like())
            else {
                return Err(Error::manifest_conflict(at));
            };
            merge_table(target, patch, at)
        }
        (false, false) => Ok(replace_value(existing, incoming)),
        _ => Err(Error::manifest_conflict(at)),
    }
}

/// Replace a leaf, keeping the old value's surrounding whitespace and comments
fn replace_value(existing: &mut Item, incoming: &Item) -> bool {
    match (existing.as_value(), incoming.as_value()) {
        (Some(old), Some(new)) => {
            if same_value(old, new) {
                return false;
            }
            let mut new = new.clone();
            *new.decor_mut() = old.decor().clone();
            *existing = Item::Value(new);
            true
        }
        _ => {
            *existing = incoming.clone();
            true
        }
    }
}

/// Semantic equality: quote style, number formatting and decor are ignored
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.value() == b.value(),
        (Value::Integer(a), Value::Integer(b)) => a.value() == b.value(),
        (Value::Float(a), Value::Float(b)) => a.value() == b.value(),
        (Value::Boolean(a), Value::Boolean(b)) => a.value() == b.value(),
        (Value::Datetime(a), Value::Datetime(b)) => a.value() == b.value(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| same_value(x, y))
        }
        (Value::InlineTable(a), Value::InlineTable(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => false,
    }
}

fn mark_implicit(table: &mut Table) {
    table.set_implicit(true);
    for (_, item) in table.iter_mut() {
        if let Item::Table(child) = item {
            mark_implicit(child);
        }
    }
}
