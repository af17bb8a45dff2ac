//! Per-user locations: config home, data directory, default files.

use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "flitro";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "flitro.log";

/// `$XDG_CONFIG_HOME` when set and non-empty, otherwise `~/.config`.
pub fn config_home() -> Option<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
        _ => std::env::var("HOME")
            .ok()
            .filter(|home| !home.trim().is_empty())
            .map(|home| PathBuf::from(home).join(".config")),
    }
}

/// Path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    config_home().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Application-support directory holding `contexts.json` and the default log.
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "Flitro").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_log_file() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(LOG_FILE_NAME))
}
