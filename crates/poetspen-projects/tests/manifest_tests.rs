//! Integration tests for on-disk manifest patching

mod common;

use common::{pyproject, utf8_temp};
use poetspen_projects::manifest::{add_item, nested_table, Manifest};
use poetspen_projects::{Error, ProjectHandle};
use std::fs;
use toml_edit::{value, Table};

fn project_with(content: &str) -> (tempfile::TempDir, ProjectHandle) {
    let (temp, root) = utf8_temp();
    fs::write(root.join("pyproject.toml"), content).unwrap();
    let handle = ProjectHandle::open(&root).unwrap();
    (temp, handle)
}

#[test]
fn test_add_script_keeps_existing_keys() {
    let (_temp, project) = project_with(&pyproject("x"));
    let before = Manifest::load(&project.manifest_path()).unwrap();

    let patch = nested_table(&["poetry", "scripts"], "x", value("x:main"));
    add_item(&project, "tool", &patch).unwrap();

    let after = Manifest::load(&project.manifest_path()).unwrap();
    assert_eq!(after.get_str("tool.poetry.scripts.x"), Some("x:main"));
    for key in [
        "tool.poetry.name",
        "tool.poetry.version",
        "tool.poetry.dependencies.python",
        "build-system.build-backend",
    ] {
        assert_eq!(after.get_str(key), before.get_str(key), "{} changed", key);
    }

    let text = fs::read_to_string(project.manifest_path()).unwrap();
    assert!(text.contains("description = \"\"  # filled in later"));
    assert!(text.contains("requires = [\"poetry-core\"]"));
}

#[test]
fn test_add_item_is_idempotent() {
    let (_temp, project) = project_with(&pyproject("x"));
    let patch = nested_table(&["poetry", "scripts"], "x", value("x:main"));

    add_item(&project, "tool", &patch).unwrap();
    let first = fs::read(project.manifest_path()).unwrap();
    add_item(&project, "tool", &patch).unwrap();
    let second = fs::read(project.manifest_path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_add_item_merges_sibling_nested_keys() {
    let (_temp, project) = project_with(&pyproject("x"));

    add_item(
        &project,
        "tool",
        &nested_table(&["poetry", "scripts"], "first", value("x:first")),
    )
    .unwrap();
    add_item(
        &project,
        "tool",
        &nested_table(&["poetry", "scripts"], "second", value("x:second")),
    )
    .unwrap();

    let manifest = Manifest::load(&project.manifest_path()).unwrap();
    assert_eq!(manifest.get_str("tool.poetry.scripts.first"), Some("x:first"));
    assert_eq!(manifest.get_str("tool.poetry.scripts.second"), Some("x:second"));
}

#[test]
fn test_add_item_overwrites_matching_nested_key() {
    let (_temp, project) = project_with(&pyproject("x"));

    add_item(
        &project,
        "tool",
        &nested_table(&["poetry", "dependencies"], "python", value("^3.12")),
    )
    .unwrap();

    let manifest = Manifest::load(&project.manifest_path()).unwrap();
    assert_eq!(manifest.get_str("tool.poetry.dependencies.python"), Some("^3.12"));
    assert_eq!(manifest.get_str("tool.poetry.name"), Some("x"));
}

#[test]
fn test_add_new_top_level_table() {
    let (_temp, project) = project_with(&pyproject("x"));
    let mut urls = Table::new();
    urls.insert("homepage", value("https://example.org"));
    let mut patch = Table::new();
    patch.insert("urls", toml_edit::Item::Table(urls));

    add_item(&project, "metadata", &patch).unwrap();

    let text = fs::read_to_string(project.manifest_path()).unwrap();
    assert!(text.contains("[metadata.urls]"));
    assert!(text.contains("homepage = \"https://example.org\""));
    assert!(text.starts_with("[tool.poetry]\nname = \"x\""));
}

#[test]
fn test_add_item_on_invalid_manifest() {
    let (temp, root) = utf8_temp();
    fs::write(root.join("pyproject.toml"), "[tool.poetry]\nname = \"x\"\n").unwrap();
    let project = ProjectHandle::open(&root).unwrap();
    fs::write(root.join("pyproject.toml"), "[tool.poetry\nbroken").unwrap();

    let result = add_item(&project, "tool", &nested_table(&["poetry"], "a", value("b")));

    assert!(matches!(result, Err(Error::ManifestParse { .. })));
    assert_eq!(
        fs::read_to_string(root.join("pyproject.toml")).unwrap(),
        "[tool.poetry\nbroken"
    );
    drop(temp);
}

#[test]
fn test_add_item_without_manifest_is_io_error() {
    let (_temp, root) = utf8_temp();
    let project = ProjectHandle::new(root, "ghost");

    let result = add_item(&project, "tool", &nested_table(&["poetry"], "a", value("b")));

    assert!(matches!(result, Err(Error::Io(_))));
}
