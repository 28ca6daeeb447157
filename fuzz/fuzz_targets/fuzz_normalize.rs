#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Normalization is lexical and total - this should never panic,
        // and normalizing twice must be a fixed point
        let once = provepack::paths::normalize(Path::new(content));
        let twice = provepack::paths::normalize(&once);
        assert_eq!(once, twice);
    }
});
