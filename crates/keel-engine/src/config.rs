//! Runtime configuration rewriting.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use keel_identity::ProjectIdentity;
use keel_tree::{PropertyTree, TreeError, YamlDocument};

use crate::template::{CONFIG_FILE, CONFIG_NAME_PATH, CONFIG_SECRET_PATH};
use crate::{fs, RewriteError};

/// Bytes of entropy behind each generated token secret.
const SECRET_LEN: usize = 32;

/// Sets the display name slot to the module's space-joined title-cased words
/// and the secret slot to a freshly generated value. Keys the identity does
/// not own are left untouched.
pub fn rewrite_config<T: PropertyTree>(
    tree: &mut T,
    identity: &ProjectIdentity,
) -> Result<(), TreeError> {
    tree.set(&CONFIG_NAME_PATH, &identity.display_name())?;
    tree.set(&CONFIG_SECRET_PATH, &generate_token_secret())?;
    Ok(())
}

/// 32 random bytes rendered as hex, then the hex text base64-encoded.
/// Never derived from the identity; every call yields a distinct value.
pub fn generate_token_secret() -> String {
    use rand_core::{OsRng, RngCore};

    let mut bytes = [0u8; SECRET_LEN];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(hex::encode(bytes).as_bytes())
}

pub(crate) fn rewrite_config_file(
    root: &Path,
    identity: &ProjectIdentity,
) -> Result<(), RewriteError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Err(RewriteError::MissingFile { path });
    }

    let tree_err = |source: TreeError| RewriteError::Tree {
        path: root.join(CONFIG_FILE),
        source,
    };

    let text = fs::read_file(&path)?;
    let mut config = YamlDocument::parse(&text).map_err(tree_err)?;
    rewrite_config(&mut config, identity).map_err(tree_err)?;
    fs::write_file(&path, &config.to_text().map_err(tree_err)?)?;

    tracing::debug!(target = "keel.engine", path = %path.display(), "config rewritten");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_name_and_secret_are_written() {
        let mut config = YamlDocument::parse(
            "app:\n  name: sample-app\n  security:\n    token-secret: changeme\nserver:\n  port: 8080\n",
        )
        .unwrap();
        let identity = ProjectIdentity::new("Order Service", "com.acme", "order-svc").unwrap();
        rewrite_config(&mut config, &identity).unwrap();

        assert_eq!(config.get(&CONFIG_NAME_PATH).as_deref(), Some("Order Svc"));
        let secret = config.get(&CONFIG_SECRET_PATH).unwrap();
        assert!(!secret.is_empty());
        assert_ne!(secret, "changeme");
        // Unknown keys survive.
        assert_eq!(config.get(&["server", "port"]).as_deref(), Some("8080"));
    }

    #[test]
    fn secrets_decode_back_to_fresh_entropy() {
        let secret = generate_token_secret();
        let hex_text = BASE64.decode(secret.as_bytes()).unwrap();
        let bytes = hex::decode(&hex_text).unwrap();
        assert_eq!(bytes.len(), SECRET_LEN);
    }

    #[test]
    fn secrets_differ_across_calls() {
        assert_ne!(generate_token_secret(), generate_token_secret());
    }
}
