#![no_main]

use libfuzzer_sys::fuzz_target;
use javastyle::{analyze_source, StyleConfig};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (may fail for invalid UTF-8, that's fine)
    if let Ok(input) = std::str::from_utf8(data) {
        // Lex and syntax errors are expected; anything else is a bug
        if let Err(e) = analyze_source(input, &StyleConfig::default()) {
            assert!(e.is_front_end(), "{e}");
        }
    }
});
