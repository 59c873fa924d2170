//! Source tree rewriting.
//!
//! Walks the main and test source roots replacing the template's package
//! token in file contents, then rewrites and renames the entry point class.
//! Substitution is literal text replacement, not a language-aware refactor;
//! the token is rewritten wherever it appears, string literals and comments
//! included.

use std::path::{Path, PathBuf};

use keel_identity::ProjectIdentity;

use crate::template::{self, DEFAULT_ENTRY_POINT, DEFAULT_PACKAGE_TOKEN, ENTRY_POINT_SUFFIX};
use crate::{fs, RewriteError};

/// Rewrites every file under both source roots and renames the entry point.
/// Returns the renamed entry point path, still at its pre-remap location.
pub(crate) fn rewrite_sources(
    root: &Path,
    identity: &ProjectIdentity,
) -> Result<PathBuf, RewriteError> {
    let main_root = template::main_sources(root);
    let test_root = template::test_sources(root);
    for dir in [&main_root, &test_root] {
        if !dir.is_dir() {
            return Err(RewriteError::MissingDir { path: dir.clone() });
        }
    }

    let token = identity.package_token();
    substitute_package_token(&main_root, &token)?;
    substitute_package_token(&test_root, &token)?;

    rename_entry_point(&main_root, identity)
}

fn substitute_package_token(source_root: &Path, token: &str) -> Result<(), RewriteError> {
    for path in fs::collect_files(source_root)? {
        let text = fs::read_file(&path)?;
        if text.contains(DEFAULT_PACKAGE_TOKEN) {
            fs::write_file(&path, &text.replace(DEFAULT_PACKAGE_TOKEN, token))?;
        }
    }
    Ok(())
}

/// Rewrites the entry point's class name in place, then renames the file.
/// Content must be rewritten before the rename so both edits hit the same
/// path.
fn rename_entry_point(
    main_root: &Path,
    identity: &ProjectIdentity,
) -> Result<PathBuf, RewriteError> {
    let old_file = format!("{DEFAULT_ENTRY_POINT}.java");
    let entry = fs::collect_files(main_root)?
        .into_iter()
        .find(|path| path.file_name().is_some_and(|name| name == old_file.as_str()));
    let Some(entry) = entry else {
        return Err(RewriteError::MissingFile {
            path: main_root.join(&old_file),
        });
    };

    let new_class = format!("{}{ENTRY_POINT_SUFFIX}", identity.entry_point_name());
    let text = fs::read_file(&entry)?;
    fs::write_file(&entry, &text.replace(DEFAULT_ENTRY_POINT, &new_class))?;

    let renamed = entry.with_file_name(format!("{new_class}.java"));
    if renamed != entry {
        std::fs::rename(&entry, &renamed).map_err(|source| fs::io_err(&entry, source))?;
        tracing::debug!(
            target = "keel.engine",
            from = %entry.display(),
            to = %renamed.display(),
            "entry point renamed"
        );
    }
    Ok(renamed)
}
