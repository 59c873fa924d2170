//! The identity rewrite engine.
//!
//! Takes a project root freshly populated from the template repository plus a
//! validated [`ProjectIdentity`] and re-keys the whole tree to that identity:
//! build descriptor slots, package tokens in source contents, the entry point
//! class and file name, the package directory layout, and the runtime config.
//!
//! [`rewrite_project`] runs the steps strictly in order. The package remap
//! must see already-rewritten file contents, so it runs after the source
//! rewrite; the config rewrite is independent and runs last. Every failure is
//! fatal to the invocation and leaves the tree partially rewritten, so
//! callers must serialize invocations per project root.

pub mod config;
pub mod descriptor;
mod fs;
pub mod remap;
mod sources;
pub mod template;

use std::io;
use std::path::{Path, PathBuf};

use keel_identity::ProjectIdentity;
use keel_tree::TreeError;

pub use remap::{classify_overlap, NamespaceOverlap};

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// A file the template contract requires is absent.
    #[error("missing template file {path}")]
    MissingFile { path: PathBuf },

    /// A directory the template contract requires is absent.
    #[error("missing template directory {path}")]
    MissingDir { path: PathBuf },

    /// A symbolic link inside a rewritten tree; the rewrite only carries
    /// regular files and directories.
    #[error("unsupported symbolic link {path}")]
    UnsupportedLink { path: PathBuf },

    #[error("failed to rewrite {path}: {source}")]
    Tree {
        path: PathBuf,
        #[source]
        source: TreeError,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a completed rewrite produced.
#[derive(Debug, Clone)]
pub struct RewriteSummary {
    /// Dotted package token now used throughout the tree.
    pub package_token: String,
    /// Entry point file after rename and remap.
    pub entry_point: PathBuf,
    /// Default package directories removed by the overlap rule.
    pub removed_dirs: Vec<PathBuf>,
}

/// Rewrites the tree at `root` to `identity`.
pub fn rewrite_project(
    root: &Path,
    identity: &ProjectIdentity,
) -> Result<RewriteSummary, RewriteError> {
    tracing::info!(
        target = "keel.engine",
        root = %root.display(),
        package = %identity.package_token(),
        "rewriting project"
    );

    descriptor::rewrite_descriptor_file(root, identity)?;
    let renamed = sources::rewrite_sources(root, identity)?;
    let outcome = remap::remap_packages(root, identity)?;
    config::rewrite_config_file(root, identity)?;

    // The entry point was renamed in the default package dir; report where
    // the remap left it.
    let default_main = template::default_package_dir(&template::main_sources(root));
    let entry_point = match renamed.strip_prefix(&default_main) {
        Ok(rel) => outcome.main_package_dir.join(rel),
        Err(_) => renamed,
    };

    Ok(RewriteSummary {
        package_token: identity.package_token(),
        entry_point,
        removed_dirs: outcome.removed,
    })
}
