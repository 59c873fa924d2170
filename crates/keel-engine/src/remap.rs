//! Package directory remapping.
//!
//! Copies the default package tree to the identity-derived location under
//! each source root, then removes the default directories according to the
//! overlap rule. The rule exists because the new package path can share a
//! prefix with, or nest inside, the default one; unconditional deletion would
//! destroy the files copied a moment earlier.

use std::io;
use std::path::{Path, PathBuf};

use keel_identity::ProjectIdentity;

use crate::template::{self, DEFAULT_MODULE, DEFAULT_NAMESPACE, DEFAULT_PACKAGE_DIRS};
use crate::{fs, RewriteError};

/// How much of the template's default namespace the new namespace shares,
/// judged segment by segment from the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceOverlap {
    /// No leading segment in common.
    None,
    /// Shares the organization segment only.
    Organization,
    /// Covers the whole default namespace, either equal to it or nested
    /// below it.
    Full,
}

pub fn classify_overlap(namespace: &str) -> NamespaceOverlap {
    let shared = namespace
        .split('.')
        .zip(DEFAULT_NAMESPACE.split('.'))
        .take_while(|(seg, default)| seg == default)
        .count();
    match shared {
        0 => NamespaceOverlap::None,
        1 => NamespaceOverlap::Organization,
        _ => NamespaceOverlap::Full,
    }
}

/// Directory to remove under each source root once the copy has happened,
/// relative to the root. `None` means the new tree is the default tree and
/// nothing may be removed.
fn removal_target(identity: &ProjectIdentity) -> Option<PathBuf> {
    let depth = match classify_overlap(identity.namespace()) {
        NamespaceOverlap::None => 1,
        NamespaceOverlap::Organization => 2,
        NamespaceOverlap::Full => {
            if identity.namespace() == DEFAULT_NAMESPACE && identity.module() == DEFAULT_MODULE {
                return None;
            }
            3
        }
    };
    Some(DEFAULT_PACKAGE_DIRS[..depth].iter().collect())
}

pub(crate) struct RemapOutcome {
    /// The identity-derived package directory under the main source root.
    pub main_package_dir: PathBuf,
    /// Default directories actually removed, across both source roots.
    pub removed: Vec<PathBuf>,
}

pub(crate) fn remap_packages(
    root: &Path,
    identity: &ProjectIdentity,
) -> Result<RemapOutcome, RewriteError> {
    let target = removal_target(identity);
    let mut removed = Vec::new();

    for source_root in [template::main_sources(root), template::test_sources(root)] {
        let old_dir = template::default_package_dir(&source_root);
        let new_dir = template::package_dir(&source_root, identity);
        if !old_dir.is_dir() {
            return Err(RewriteError::MissingDir { path: old_dir });
        }

        if new_dir != old_dir {
            copy_tree(&old_dir, &new_dir)?;
        }

        if let Some(rel) = &target {
            let victim = source_root.join(rel);
            // Never remove a directory the new package tree lives under.
            if new_dir.starts_with(&victim) {
                tracing::debug!(
                    target = "keel.engine",
                    path = %victim.display(),
                    "default dir kept, new package tree nests inside it"
                );
                continue;
            }
            remove_tree(&victim)?;
            removed.push(victim);
        }
    }

    Ok(RemapOutcome {
        main_package_dir: template::package_dir(&template::main_sources(root), identity),
        removed,
    })
}

/// Copies every file under `from` into `to`, preserving relative structure.
/// The file list is collected up front so a destination nested inside the
/// source is never re-walked.
fn copy_tree(from: &Path, to: &Path) -> Result<(), RewriteError> {
    let files = fs::collect_files(from)?;
    std::fs::create_dir_all(to).map_err(|source| fs::io_err(to, source))?;

    for file in files {
        let Ok(rel) = file.strip_prefix(from) else {
            continue;
        };
        let dest = to.join(rel);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|source| fs::io_err(parent, source))?;
        }
        std::fs::copy(&file, &dest).map_err(|source| fs::io_err(&file, source))?;
    }
    Ok(())
}

fn remove_tree(path: &Path) -> Result<(), RewriteError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!(target = "keel.engine", path = %path.display(), "default package dir removed");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(fs::io_err(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity(namespace: &str, module: &str) -> ProjectIdentity {
        ProjectIdentity::new("svc", namespace, module).unwrap()
    }

    #[test]
    fn overlap_is_classified_segment_wise() {
        assert_eq!(classify_overlap("com.acme"), NamespaceOverlap::None);
        // A string prefix is not a segment match.
        assert_eq!(classify_overlap("rooted.example"), NamespaceOverlap::None);
        assert_eq!(classify_overlap("root"), NamespaceOverlap::Organization);
        assert_eq!(classify_overlap("root.acme"), NamespaceOverlap::Organization);
        assert_eq!(classify_overlap("root.example"), NamespaceOverlap::Full);
        assert_eq!(
            classify_overlap("root.example.payments"),
            NamespaceOverlap::Full
        );
    }

    #[test]
    fn removal_target_follows_the_overlap_rule() {
        assert_eq!(
            removal_target(&identity("com.acme", "order-svc")),
            Some(PathBuf::from("root"))
        );
        assert_eq!(
            removal_target(&identity("root.acme", "order-svc")),
            Some(PathBuf::from("root/example"))
        );
        assert_eq!(
            removal_target(&identity("root.example", "order-svc")),
            Some(PathBuf::from("root/example/sample_app"))
        );
        // Exact default identity: the new tree is the old tree.
        assert_eq!(removal_target(&identity("root.example", "sample-app")), None);
        // Nested below the default namespace still clears the default leaf.
        assert_eq!(
            removal_target(&identity("root.example.payments", "billing")),
            Some(PathBuf::from("root/example/sample_app"))
        );
    }
}
