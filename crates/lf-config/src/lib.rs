//! levelfit configuration loading and validation.
//!
//! This crate provides:
//! - Typed settings for `levelfit.toml`
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use settings::{AnalysisSettings, InputSettings, ReportSettings, Settings, UnknownLevelPolicy};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// File name looked up in every config directory.
pub const CONFIG_FILENAME: &str = "levelfit.toml";
