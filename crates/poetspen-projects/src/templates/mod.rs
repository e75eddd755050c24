//! Project template system.
//!
//! Templates are static boilerplate files copied verbatim into a freshly
//! scaffolded project. No variable substitution is performed.
//!
//! # Layout
//!
//! The template tree (embedded, or a directory configured with
//! `template-dir`) is organised by destination:
//!
//! ```text
//! templates/
//! ├── .gitignore.default            -> <project>/.gitignore
//! ├── .github/workflows/tests.ci.yml -> <project>/.github/workflows/tests.yml
//! ├── package/__main__.default.py   -> <project>/<package>/__main__.py
//! └── tests/conftest.pytest.py      -> <project>/tests/conftest.py
//! ```
//!
//! The segment before the extension is the category label. Callers request
//! an ordered list of categories; when two templates target the same file,
//! the one from the earlier category wins, ties broken by template path.
//!
//! # Example Usage
//!
//! ```no_run
//! use poetspen_projects::templates::{TemplateMaterializer, TemplateSource};
//! use poetspen_projects::ProjectHandle;
//!
//! let materializer = TemplateMaterializer::new(TemplateSource::Embedded);
//! let project = ProjectHandle::new("/work/demo", "demo");
//! let categories = vec!["default".to_string(), "pytest".to_string()];
//! let copied = materializer.materialize(&project, &categories).unwrap();
//! println!("copied {:?}", copied);
//! ```

pub mod catalog;
pub mod materializer;

pub use catalog::{Destination, TemplateFile, TemplateSource};
pub use materializer::TemplateMaterializer;
