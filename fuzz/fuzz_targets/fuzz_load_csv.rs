//! Fuzz target for delimited input loading and record normalization.
//!
//! Tests that `load_reader` and `transform` handle arbitrary bytes without
//! panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lf_core::logging::LogContext;
use lf_core::pipeline::{load_reader, transform, LoadOptions, TransformOptions};

fuzz_target!(|data: &[u8]| {
    let ctx = LogContext::new("fuzz");
    if let Ok(raws) = load_reader(data, LoadOptions::default()) {
        let _ = transform(&raws, &TransformOptions::default(), &ctx);
    }
});
