//! Integration tests for the configuration system

use flitro::config::{paths, ConfigLoader, ValidationError};
use flitro::engine::SwitchPolicy;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use crate::integration::{with_vars, with_xdg_env};

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_sections() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = write_config(
        &temp_dir,
        r#"
[activation]
default_policy = "additive"
safari_startup_delay_ms = 250

[storage]
contexts_file = "/tmp/flitro-contexts.json"

[logging]
level = "debug"
output = "stderr"
"#,
    );

    let config = with_vars(&[], || ConfigLoader::load_from_file(&config_file)).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.activation.default_policy, SwitchPolicy::Additive);
    assert_eq!(
        config.activation.launcher_settings().safari_startup_delay,
        Duration::from_millis(250)
    );
    assert_eq!(
        config.storage.contexts_file,
        Some(PathBuf::from("/tmp/flitro-contexts.json"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_defaults_from_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = write_config(&temp_dir, "");

    let config = with_vars(&[], || ConfigLoader::load_from_file(&config_file)).unwrap();
    assert_eq!(config.activation.default_policy, SwitchPolicy::Replace);
    assert_eq!(config.activation.safari_startup_delay_ms, 500);
    assert!(!config.activation.dry_run);
    assert!(config.storage.contexts_file.is_none());
    assert_eq!(config.logging.output, "file");
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = write_config(
        &temp_dir,
        "[activation]\ndefault_policy = \"replace\"\n",
    );

    let config = with_vars(
        &[
            ("FLITRO__ACTIVATION__DEFAULT_POLICY", "additive"),
            ("FLITRO__ACTIVATION__SAFARI_STARTUP_DELAY_MS", "750"),
        ],
        || ConfigLoader::load_from_file(&config_file),
    )
    .unwrap();
    assert_eq!(config.activation.default_policy, SwitchPolicy::Additive);
    assert_eq!(config.activation.safari_startup_delay_ms, 750);
}

#[test]
fn test_global_file_under_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    let config = with_xdg_env(&test_dir, || {
        let global = paths::global_config_path().unwrap();
        assert_eq!(global, test_dir.path().join("flitro").join("config.toml"));
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        std::fs::write(&global, "[activation]\ndry_run = true\n").unwrap();
        ConfigLoader::load()
    })
    .unwrap();
    assert!(config.activation.dry_run);
}

#[test]
fn test_missing_global_file_uses_defaults() {
    let test_dir = TempDir::new().unwrap();
    let config = with_xdg_env(&test_dir, ConfigLoader::load).unwrap();
    assert_eq!(config.activation.default_policy, SwitchPolicy::Replace);
}

#[test]
fn test_explicit_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");
    assert!(with_vars(&[], || ConfigLoader::load_from_file(&missing)).is_err());
}

#[test]
fn test_unknown_policy_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = write_config(&temp_dir, "[activation]\ndefault_policy = \"sideways\"\n");
    assert!(with_vars(&[], || ConfigLoader::load_from_file(&config_file)).is_err());
}

#[test]
fn test_validation_collects_every_problem() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = write_config(
        &temp_dir,
        r#"
[activation]
safari_startup_delay_ms = 60000

[logging]
format = "xml"
output = "syslog"
"#,
    );

    let config = with_vars(&[], || ConfigLoader::load_from_file(&config_file)).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], ValidationError::Activation(_)));
    assert!(errors[1..]
        .iter()
        .all(|e| matches!(e, ValidationError::Logging(_))));
}
