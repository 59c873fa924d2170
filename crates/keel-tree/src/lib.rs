//! Ordered property trees over the two structured-text formats keel rewrites:
//! the Maven build descriptor (XML) and the application configuration (YAML).
//!
//! The rewrite engine programs against [`PropertyTree`] only, so the rewriters
//! stay independent of either format. The two backends differ where the
//! formats differ: [`pom::PomDocument`] edits the original text in place and
//! round-trips untouched content byte for byte, while [`yaml::YamlDocument`]
//! is a value tree that preserves unknown keys and their order but not
//! comments or exotic formatting.

pub mod pom;
pub mod yaml;

pub use pom::PomDocument;
pub use yaml::YamlDocument;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no element at {path:?}")]
    MissingElement { path: String },

    #[error("element at {path:?} is not a scalar slot")]
    NotScalar { path: String },

    #[error("node at {path:?} is not a mapping")]
    NotMapping { path: String },
}

/// Get/set/remove over a tree of named properties.
///
/// Paths are sequences of child keys from the root: `["app", "name"]` is the
/// `name` entry of the top-level `app` node. `set` replaces an existing scalar
/// (backends that can create missing nodes do so); `remove` deletes a subtree
/// and reports whether anything was there.
pub trait PropertyTree {
    fn get(&self, path: &[&str]) -> Option<String>;

    fn set(&mut self, path: &[&str], value: &str) -> Result<(), TreeError>;

    fn remove(&mut self, path: &[&str]) -> Result<bool, TreeError>;
}

pub(crate) fn joined(path: &[&str]) -> String {
    path.join(".")
}
