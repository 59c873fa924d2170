//! Layout contract of the template repository.
//!
//! Everything the engine assumes about the cloned tree lives here: the default
//! identity baked into the template, the fixed source roots, the entry point
//! naming convention and the descriptor/config locations. A template that does
//! not honor this contract fails the rewrite with a precondition error.

use std::path::{Path, PathBuf};

use keel_identity::ProjectIdentity;

/// Namespace the template ships under.
pub const DEFAULT_NAMESPACE: &str = "root.example";
/// Module the template ships under.
pub const DEFAULT_MODULE: &str = "sample-app";

/// Directory spelling of the default package under each source root.
pub const DEFAULT_PACKAGE_DIRS: [&str; 3] = ["root", "example", "sample_app"];
/// Dotted spelling of the default package. This is the literal token
/// substituted in source file contents.
pub const DEFAULT_PACKAGE_TOKEN: &str = "root.example.sample_app";

pub const MAIN_SOURCES: &str = "src/main/java";
pub const TEST_SOURCES: &str = "src/test/java";

pub const DESCRIPTOR_FILE: &str = "pom.xml";
pub const CONFIG_FILE: &str = "src/main/resources/application.yml";

/// Class name suffix shared by the template entry point and every generated
/// one.
pub const ENTRY_POINT_SUFFIX: &str = "Application";
/// Entry point class baked into the template: `DEFAULT_MODULE` title-cased
/// plus [`ENTRY_POINT_SUFFIX`].
pub const DEFAULT_ENTRY_POINT: &str = "SampleAppApplication";

/// Written into the descriptor's description slot in place of the
/// template-authored text.
pub const DESCRIPTION_PLACEHOLDER: &str = "TODO: describe the service";

/// Config slot holding the application display name.
pub const CONFIG_NAME_PATH: [&str; 2] = ["app", "name"];
/// Config slot holding the generated token secret.
pub const CONFIG_SECRET_PATH: [&str; 3] = ["app", "security", "token-secret"];

pub fn main_sources(root: &Path) -> PathBuf {
    root.join(MAIN_SOURCES)
}

pub fn test_sources(root: &Path) -> PathBuf {
    root.join(TEST_SOURCES)
}

/// The default package directory under `source_root`.
pub fn default_package_dir(source_root: &Path) -> PathBuf {
    DEFAULT_PACKAGE_DIRS
        .iter()
        .fold(source_root.to_path_buf(), |dir, seg| dir.join(seg))
}

/// The identity-derived package directory under `source_root`.
pub fn package_dir(source_root: &Path, identity: &ProjectIdentity) -> PathBuf {
    identity
        .package_path()
        .iter()
        .fold(source_root.to_path_buf(), |dir, seg| dir.join(seg))
}
