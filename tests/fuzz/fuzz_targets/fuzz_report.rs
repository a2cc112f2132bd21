#![no_main]
use libfuzzer_sys::fuzz_target;

use covshield::badge::Classifier;
use covshield::ignore::IgnorePatternSet;

fuzz_target!(|data: &[u8]| {
    // Parsing, filtering and classifying must not panic on any input.
    if let Ok(s) = std::str::from_utf8(data) {
        let table = covshield::parsers::text::parse(s);
        if let Ok(ignore) = IgnorePatternSet::parse(s) {
            let _ = Classifier::default().classify(&ignore.filter(table));
        }
    }
});
