#![no_main]
use libfuzzer_sys::fuzz_target;

use covshield::badge::DEFAULT_MARKER_PATTERN;
use covshield::patch::patch_content;

const BADGE: &str = "![Code Coverage](https://img.shields.io/badge/coverage-80.0%25-green)";

fuzz_target!(|data: &[u8]| {
    // Patching is idempotent on any content.
    if let Ok(s) = std::str::from_utf8(data) {
        let marker = regex::Regex::new(DEFAULT_MARKER_PATTERN).unwrap();
        let (once, _) = patch_content(s, &marker, BADGE, true);
        let (twice, _) = patch_content(&once, &marker, BADGE, true);
        assert_eq!(once, twice);
    }
});
