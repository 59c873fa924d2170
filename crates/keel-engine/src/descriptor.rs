//! Build descriptor rewriting.

use std::path::Path;

use keel_identity::ProjectIdentity;
use keel_tree::{PomDocument, PropertyTree, TreeError};

use crate::template::{DESCRIPTION_PLACEHOLDER, DESCRIPTOR_FILE};
use crate::{fs, RewriteError};

const GROUP_ID: &[&str] = &["groupId"];
const ARTIFACT_ID: &[&str] = &["artifactId"];
const NAME: &[&str] = &["name"];
const DESCRIPTION: &[&str] = &["description"];
// Template-authored metadata that must not leak into generated projects.
const LICENSES: &[&str] = &["licenses"];
const DEVELOPERS: &[&str] = &["developers"];

/// Re-keys the descriptor slots to `identity`: the group id takes the
/// namespace, the artifact id the module, the name slot the human-readable
/// project name. The description is reset to a placeholder and any license or
/// developer blocks are dropped wholesale.
///
/// Fails when one of the four scalar slots is absent from the descriptor.
pub fn rewrite_descriptor<T: PropertyTree>(
    tree: &mut T,
    identity: &ProjectIdentity,
) -> Result<(), TreeError> {
    tree.set(GROUP_ID, identity.namespace())?;
    tree.set(ARTIFACT_ID, identity.module())?;
    tree.set(NAME, identity.name())?;
    tree.set(DESCRIPTION, DESCRIPTION_PLACEHOLDER)?;
    tree.remove(LICENSES)?;
    tree.remove(DEVELOPERS)?;
    Ok(())
}

pub(crate) fn rewrite_descriptor_file(
    root: &Path,
    identity: &ProjectIdentity,
) -> Result<(), RewriteError> {
    let path = root.join(DESCRIPTOR_FILE);
    if !path.is_file() {
        return Err(RewriteError::MissingFile { path });
    }

    let text = fs::read_file(&path)?;
    let mut pom = PomDocument::parse(text).map_err(|source| RewriteError::Tree {
        path: path.clone(),
        source,
    })?;
    rewrite_descriptor(&mut pom, identity).map_err(|source| RewriteError::Tree {
        path: path.clone(),
        source,
    })?;
    fs::write_file(&path, pom.text())?;

    tracing::debug!(target = "keel.engine", path = %path.display(), "descriptor rewritten");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POM: &str = "\
<project>
    <groupId>root.example</groupId>
    <artifactId>sample-app</artifactId>
    <name>sample-app</name>
    <description>Template service skeleton</description>
    <licenses>
        <license><name>Apache-2.0</name></license>
    </licenses>
    <developers>
        <developer><name>Template Author</name></developer>
    </developers>
    <properties>
        <java.version>21</java.version>
    </properties>
</project>
";

    fn identity() -> ProjectIdentity {
        ProjectIdentity::new("Order Service", "com.acme", "order-svc").unwrap()
    }

    #[test]
    fn rewrites_the_four_slots_and_strips_metadata() {
        let mut pom = PomDocument::parse(POM).unwrap();
        rewrite_descriptor(&mut pom, &identity()).unwrap();

        assert_eq!(pom.get(GROUP_ID).as_deref(), Some("com.acme"));
        assert_eq!(pom.get(ARTIFACT_ID).as_deref(), Some("order-svc"));
        assert_eq!(pom.get(NAME).as_deref(), Some("Order Service"));
        assert_eq!(pom.get(DESCRIPTION).as_deref(), Some(DESCRIPTION_PLACEHOLDER));
        assert!(!pom.text().contains("<licenses>"));
        assert!(!pom.text().contains("<developers>"));
        // Slots the identity does not own are untouched text.
        assert!(pom.text().contains("        <java.version>21</java.version>\n"));
    }

    #[test]
    fn missing_slot_is_an_error() {
        let mut pom = PomDocument::parse("<project><groupId>g</groupId></project>").unwrap();
        let err = rewrite_descriptor(&mut pom, &identity()).unwrap_err();
        assert!(matches!(err, TreeError::MissingElement { ref path } if path == "artifactId"));
    }

    #[test]
    fn absent_metadata_blocks_are_tolerated() {
        let mut pom = PomDocument::parse(
            "<project>\
             <groupId>g</groupId>\
             <artifactId>a</artifactId>\
             <name>n</name>\
             <description>d</description>\
             </project>",
        )
        .unwrap();
        rewrite_descriptor(&mut pom, &identity()).unwrap();
        assert_eq!(pom.get(ARTIFACT_ID).as_deref(), Some("order-svc"));
    }
}
