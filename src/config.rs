//! Configuration System
//!
//! Layered configuration: built-in defaults, the global `config.toml`, then
//! `FLITRO__SECTION__KEY` environment variables. CLI flags are applied on top by the
//! binary.

use crate::engine::SwitchPolicy;
use crate::launcher::LauncherSettings;
use crate::logging::{LoggingConfig, LOG_FORMATS, LOG_OUTPUTS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

/// Upper bound for the Safari cold-start delay.
pub const MAX_SAFARI_STARTUP_DELAY_MS: u64 = 10_000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlitroConfig {
    #[serde(default)]
    pub activation: ActivationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationConfig {
    /// Policy used when a command does not choose one.
    #[serde(default)]
    pub default_policy: SwitchPolicy,

    /// Wait before Safari's first window after a cold start (milliseconds).
    #[serde(default = "default_safari_startup_delay_ms")]
    pub safari_startup_delay_ms: u64,

    /// Record automation calls instead of performing them.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_safari_startup_delay_ms() -> u64 {
    500
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            default_policy: SwitchPolicy::default(),
            safari_startup_delay_ms: default_safari_startup_delay_ms(),
            dry_run: false,
        }
    }
}

impl ActivationConfig {
    pub fn launcher_settings(&self) -> LauncherSettings {
        LauncherSettings {
            safari_startup_delay: Duration::from_millis(self.safari_startup_delay_ms),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.safari_startup_delay_ms > MAX_SAFARI_STARTUP_DELAY_MS {
            return Err(format!(
                "safari_startup_delay_ms must be at most {} (got {})",
                MAX_SAFARI_STARTUP_DELAY_MS, self.safari_startup_delay_ms
            ));
        }
        Ok(())
    }
}

/// Storage paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the per-user location of `contexts.json`.
    #[serde(default)]
    pub contexts_file: Option<PathBuf>,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.contexts_file {
            if path.as_os_str().is_empty() {
                return Err("contexts_file cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Activation(String),
    Storage(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Activation(msg) => write!(f, "Activation: {}", msg),
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FlitroConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.activation.validate() {
            errors.push(ValidationError::Activation(e));
        }
        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}' (expected one of: {})",
                self.logging.format,
                LOG_FORMATS.join(", ")
            )));
        }
        if !LOG_OUTPUTS.contains(&self.logging.output.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid output '{}' (expected one of: {})",
                self.logging.output,
                LOG_OUTPUTS.join(", ")
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
