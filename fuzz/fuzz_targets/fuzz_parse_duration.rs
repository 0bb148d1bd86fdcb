//! Fuzz target for TimeTaken parsing.
//!
//! Any accepted value must be finite.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lf_core::pipeline::parse_duration;

fuzz_target!(|data: &str| {
    if let Ok(value) = parse_duration(data, "ms") {
        assert!(value.is_finite());
    }
});
