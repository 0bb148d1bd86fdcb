//! Fuzz target for levelfit.toml parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lf_config::{validate_settings, Settings};

fuzz_target!(|data: &str| {
    if let Ok(settings) = Settings::from_toml_str(data) {
        let _ = validate_settings(&settings);
    }
});
