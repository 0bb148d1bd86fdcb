//! Configuration resolution + validation tests against real files.
//!
//! Covers:
//! - Resolution order (CLI > env path > env dir > XDG > defaults)
//! - Loading and validating settings written to disk

use lf_config::resolve::{resolve_config, ConfigSource, ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use lf_config::{validate_settings, Settings, UnknownLevelPolicy, ValidationError};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ENV_KEYS: &[&str] = &[ENV_CONFIG_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME"];

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f()
}

fn write_config(dir: &Path, body: &str) {
    fs::create_dir_all(dir).expect("create config dir");
    fs::write(dir.join("levelfit.toml"), body).expect("write config");
}

#[test]
fn test_resolve_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let cli_dir = temp.path().join("cli");
        let env_dir = temp.path().join("env");
        write_config(&cli_dir, "");
        write_config(&env_dir, "");

        env::set_var(ENV_CONFIG_PATH, env_dir.join("levelfit.toml"));
        env::set_var(ENV_CONFIG_DIR, &env_dir);

        let cli_path = cli_dir.join("levelfit.toml");
        let resolved = resolve_config(Some(&cli_path));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path, Some(cli_path));
    });
}

#[test]
fn test_resolve_env_path_over_env_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let direct = temp.path().join("direct");
        let by_dir = temp.path().join("by_dir");
        write_config(&direct, "");
        write_config(&by_dir, "");

        env::set_var(ENV_CONFIG_PATH, direct.join("levelfit.toml"));
        env::set_var(ENV_CONFIG_DIR, &by_dir);

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path, Some(direct.join("levelfit.toml")));
    });
}

#[test]
fn test_resolve_env_dir_when_path_missing() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let by_dir = temp.path().join("by_dir");
        write_config(&by_dir, "");

        env::set_var(ENV_CONFIG_PATH, temp.path().join("absent.toml"));
        env::set_var(ENV_CONFIG_DIR, &by_dir);

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path, Some(by_dir.join("levelfit.toml")));
    });
}

#[test]
fn test_resolve_xdg_fallback() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let xdg_dir = temp.path().join("xdg");
        let app_dir = xdg_dir.join("levelfit");
        write_config(&app_dir, "");

        env::set_var("XDG_CONFIG_HOME", &xdg_dir);

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::XdgConfig);
        assert_eq!(resolved.path, Some(app_dir.join("levelfit.toml")));
    });
}

#[test]
fn test_load_and_validate_written_settings() {
    let temp = TempDir::new().expect("temp dir");
    write_config(
        temp.path(),
        r#"
[input]
delimiter = ";"
duration_suffix = "us"

[analysis]
confidence_level = 0.9
unknown_levels = "exclude"

[report]
service_counts = true
"#,
    );

    let settings = Settings::from_file(&temp.path().join("levelfit.toml")).expect("load");
    validate_settings(&settings).expect("valid settings");
    assert_eq!(settings.input.delimiter_byte(), Some(b';'));
    assert_eq!(settings.input.duration_suffix, "us");
    assert_eq!(settings.analysis.confidence_level, 0.9);
    assert_eq!(settings.analysis.significance_level, 0.05);
    assert_eq!(settings.analysis.unknown_levels, UnknownLevelPolicy::Exclude);
    assert!(settings.report.service_counts);
}

#[test]
fn test_invalid_settings_are_reported() {
    let temp = TempDir::new().expect("temp dir");
    write_config(temp.path(), "[analysis]\nsignificance_level = 5.0\n");

    let settings = Settings::from_file(&temp.path().join("levelfit.toml")).expect("load");
    let err = validate_settings(&settings).expect_err("out of range");
    assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "analysis.significance_level"));
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = Settings::from_file(&temp.path().join("nope.toml")).expect_err("missing");
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let temp = TempDir::new().expect("temp dir");
    write_config(temp.path(), "[input\ndelimiter = ");
    let err = Settings::from_file(&temp.path().join("levelfit.toml")).expect_err("malformed");
    assert!(matches!(err, ValidationError::ParseError(_)));
}
