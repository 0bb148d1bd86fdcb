//! Configuration loading for lf-core.
//!
//! This module handles:
//! - Resolving levelfit.toml (CLI > env > XDG > system > defaults)
//! - Applying per-run CLI overrides on top of the file
//! - Semantic validation of the merged settings
//! - A provenance snapshot (path, source, SHA-256) for reports

pub use lf_config::{
    resolve_config, ConfigSource, Settings, UnknownLevelPolicy, ValidationError,
};

use lf_config::validate_settings;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl From<ConfigError> for lf_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::IoError { path, source } => lf_common::Error::ConfigLoad {
                path: path.display().to_string(),
                message: source.to_string(),
            },
            ConfigError::ParseError { path, message } => lf_common::Error::ConfigLoad {
                path: path.display().to_string(),
                message,
            },
            ConfigError::ValidationError(e) => lf_common::Error::InvalidConfig(e.to_string()),
        }
    }
}

/// Per-run overrides from the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub delimiter: Option<String>,
    pub duration_suffix: Option<String>,
    pub confidence_level: Option<f64>,
    pub significance_level: Option<f64>,
    pub unknown_levels: Option<UnknownLevelPolicy>,
    pub service_counts: Option<bool>,
}

impl SettingsOverrides {
    /// Apply the overrides to `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref d) = self.delimiter {
            settings.input.delimiter.clone_from(d);
        }
        if let Some(ref s) = self.duration_suffix {
            settings.input.duration_suffix.clone_from(s);
        }
        if let Some(c) = self.confidence_level {
            settings.analysis.confidence_level = c;
        }
        if let Some(a) = self.significance_level {
            settings.analysis.significance_level = a;
        }
        if let Some(p) = self.unknown_levels {
            settings.analysis.unknown_levels = p;
        }
        if let Some(s) = self.service_counts {
            settings.report.service_counts = s;
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file path (highest priority).
    pub config_path: Option<PathBuf>,
    /// CLI overrides applied after the file is read.
    pub overrides: SettingsOverrides,
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Effective settings after overrides.
    pub settings: Settings,
    /// Path to the settings file (None if using defaults).
    pub path: Option<PathBuf>,
    /// Where the path came from.
    pub source: ConfigSource,
    /// SHA-256 of the file content (None if using defaults).
    pub hash: Option<String>,
}

/// Config provenance recorded in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub path: Option<String>,
    pub source: String,
    pub sha256: Option<String>,
    pub using_defaults: bool,
}

impl ResolvedConfig {
    /// Create a provenance snapshot.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            path: self.path.as_ref().map(|p| p.display().to_string()),
            source: self.source.as_str().to_string(),
            sha256: self.hash.clone(),
            using_defaults: self.path.is_none(),
        }
    }
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit `--config` path
/// 2. LEVELFIT_CONFIG, then LEVELFIT_CONFIG_DIR/levelfit.toml
/// 3. XDG config home (~/.config/levelfit/levelfit.toml)
/// 4. /etc/levelfit/levelfit.toml
/// 5. Built-in defaults
///
/// CLI overrides are applied last, then the merged settings are validated.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let resolved = resolve_config(options.config_path.as_deref());

    let (mut settings, hash) = match &resolved.path {
        Some(path) => {
            let (settings, hash) = load_settings_from_file(path)?;
            (settings, Some(hash))
        }
        None => (Settings::default(), None),
    };

    options.overrides.apply(&mut settings);
    validate_settings(&settings)?;

    Ok(ResolvedConfig {
        settings,
        path: resolved.path,
        source: resolved.source,
        hash,
    })
}

/// Load settings from a specific file, returning them with the content hash.
pub fn load_settings_from_file(path: &Path) -> Result<(Settings, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let hash = compute_hash(&content);

    let settings = Settings::from_toml_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok((settings, hash))
}

/// SHA-256 of content as lowercase hex.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("levelfit.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_compute_hash_is_sha256() {
        assert_eq!(
            compute_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(compute_hash("abc").len(), 64);
    }

    #[test]
    fn test_explicit_file_is_loaded_with_provenance() {
        let dir = TempDir::new().unwrap();
        let body = "[analysis]\nsignificance_level = 0.01\n";
        let path = write_config(&dir, body);

        let config = load_config(&ConfigOptions {
            config_path: Some(path.clone()),
            overrides: SettingsOverrides::default(),
        })
        .unwrap();

        assert_eq!(config.settings.analysis.significance_level, 0.01);
        assert_eq!(config.source, ConfigSource::CliArgument);
        assert_eq!(config.hash.as_deref(), Some(compute_hash(body).as_str()));

        let snapshot = config.snapshot();
        assert_eq!(snapshot.path, Some(path.display().to_string()));
        assert_eq!(snapshot.source, "cli_argument");
        assert!(!snapshot.using_defaults);
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[input]\ndelimiter = \";\"\n");

        let config = load_config(&ConfigOptions {
            config_path: Some(path),
            overrides: SettingsOverrides {
                delimiter: Some("\t".into()),
                unknown_levels: Some(UnknownLevelPolicy::Exclude),
                ..Default::default()
            },
        })
        .unwrap();

        assert_eq!(config.settings.input.delimiter, "\t");
        assert_eq!(
            config.settings.analysis.unknown_levels,
            UnknownLevelPolicy::Exclude
        );
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let err = load_config(&ConfigOptions {
            config_path: Some(path),
            overrides: SettingsOverrides {
                confidence_level: Some(1.5),
                ..Default::default()
            },
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert_eq!(lf_common::Error::from(err).code(), 11);
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&ConfigOptions {
            config_path: Some(dir.path().join("absent.toml")),
            overrides: SettingsOverrides::default(),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert_eq!(lf_common::Error::from(err).code(), 12);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[analysis]\nconfidence_level = \"high\"\n");
        let err = load_config(&ConfigOptions {
            config_path: Some(path),
            overrides: SettingsOverrides::default(),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
