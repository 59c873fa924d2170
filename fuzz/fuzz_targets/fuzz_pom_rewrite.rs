#![no_main]

use libfuzzer_sys::fuzz_target;

use keel_engine::descriptor;
use keel_identity::ProjectIdentity;
use keel_tree::pom::PomDocument;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Malformed XML must be rejected, never panicked on.
    let Ok(mut tree) = PomDocument::parse(text) else {
        return;
    };

    let identity =
        ProjectIdentity::new("Fuzz Service", "com.example", "fuzz-svc").expect("valid identity");

    // The rewrite may report a missing slot partway through, but whatever it
    // has written so far must still be well-formed XML.
    let _ = descriptor::rewrite_descriptor(&mut tree, &identity);
    PomDocument::parse(tree.into_text()).expect("rewritten descriptor stays well formed");
});
