//! Copy boilerplate files into a project.
//!
//! Selection is deterministic: the requested categories form a priority
//! table (earliest wins) and templates within a category are ordered by their
//! path in the template tree. Each destination is written at most once.

use super::catalog::{TemplateFile, TemplateSource};
use crate::error::Result;
use crate::types::ProjectHandle;
use std::collections::HashSet;
use std::fs;
use tracing::{debug, info};

/// Copies templates verbatim into project directories
#[derive(Debug, Clone, Default)]
pub struct TemplateMaterializer {
    source: TemplateSource,
}

impl TemplateMaterializer {
    /// Create a materializer reading from `source`
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    /// Template source in use
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Resolve which template wins each destination for `categories`.
    ///
    /// Categories without templates contribute nothing.
    pub fn select(&self, categories: &[String]) -> Result<Vec<TemplateFile>> {
        let mut eligible: Vec<(usize, TemplateFile)> = self
            .source
            .list()?
            .into_iter()
            .filter_map(|t| priority(categories, &t.category).map(|p| (p, t)))
            .collect();
        eligible.sort_by(|(pa, a), (pb, b)| pa.cmp(pb).then_with(|| a.relative_path.cmp(&b.relative_path)));

        let mut claimed = HashSet::new();
        let mut selected = Vec::new();
        for (_, template) in eligible {
            if claimed.insert(template.destination_key()) {
                selected.push(template);
            } else {
                debug!(
                    "Template {} shadowed by a higher priority template for {}",
                    template.relative_path, template
                );
            }
        }
        Ok(selected)
    }

    /// Copy the selected templates for `categories` into `project`.
    ///
    /// Returns the logical file names copied.
    pub fn materialize(&self, project: &ProjectHandle, categories: &[String]) -> Result<Vec<String>> {
        Ok(self
            .copy_templates(project, categories)?
            .into_iter()
            .map(|t| t.logical_name)
            .collect())
    }

    /// Like [`materialize`](Self::materialize), returning the templates
    /// actually written
    pub fn copy_templates(
        &self,
        project: &ProjectHandle,
        categories: &[String],
    ) -> Result<Vec<TemplateFile>> {
        let mut written = HashSet::new();
        let mut copied = Vec::new();

        for template in self.select(categories)? {
            let destination = template.destination_in(project);
            if !written.insert(destination.clone()) {
                debug!("Skipping {}: {} already written", template.relative_path, destination);
                continue;
            }

            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&destination, self.source.read(&template)?)?;

            debug!("Copied {} -> {}", template.relative_path, destination);
            copied.push(template);
        }

        info!("Copied {} template file(s) into {}", copied.len(), project.root());
        Ok(copied)
    }
}

/// Index of `category` in the priority table, first occurrence wins
fn priority(categories: &[String], category: &str) -> Option<usize> {
    categories.iter().position(|c| c == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_priority_first_occurrence() {
        let categories = cats(&["pytest", "default", "pytest"]);
        assert_eq!(priority(&categories, "pytest"), Some(0));
        assert_eq!(priority(&categories, "default"), Some(1));
        assert_eq!(priority(&categories, "ci"), None);
    }

    #[test]
    fn test_select_embedded_by_category() {
        let materializer = TemplateMaterializer::default();

        let selected = materializer.select(&cats(&["default"])).unwrap();
        assert!(selected.iter().all(|t| t.category == "default"));
        assert!(selected.iter().any(|t| t.logical_name == "__main__.py"));

        assert!(materializer.select(&cats(&["no-such-category"])).unwrap().is_empty());
        assert!(materializer.select(&[]).unwrap().is_empty());
    }
}
