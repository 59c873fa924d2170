#![no_main]

use libfuzzer_sys::fuzz_target;

use keel_identity::ProjectIdentity;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // The validators must be total: no panic on any input, including empty
    // strings and pathological separator runs.
    let mut parts = text.splitn(3, '\n');
    let name = parts.next().unwrap_or("");
    let namespace = parts.next().unwrap_or("");
    let module = parts.next().unwrap_or("");

    let _ = keel_identity::is_valid_name(name);
    let _ = keel_identity::is_valid_namespace(namespace);
    let _ = keel_identity::is_valid_module(module);

    // Every accepted identity must derive well-formed package material.
    if let Ok(identity) = ProjectIdentity::new(name, namespace, module) {
        let path = identity.package_path();
        assert!(!path.is_empty());
        for segment in &path {
            assert!(!segment.is_empty());
            assert!(!segment.contains('-'));
            assert!(!segment.contains('.'));
        }
        assert_eq!(identity.package_token(), path.join("."));
        assert!(!identity.entry_point_name().is_empty());
        assert!(!identity.display_name().is_empty());
    }
});
