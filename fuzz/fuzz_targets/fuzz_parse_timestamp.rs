//! Fuzz target for timestamp parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lf_core::pipeline::parse_timestamp;

fuzz_target!(|data: &str| {
    // Unmatched input yields None, never a panic
    let _ = parse_timestamp(data, &[]);
});
