//! Loading entry point: defaults, then the global file (or an explicit file), then
//! the environment.

use super::merge::merge_policy;
use super::sources::{environment, global_file};
use super::{paths, FlitroConfig};
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global config file and the environment.
    pub fn load() -> Result<FlitroConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load from `path` instead of the global file. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<FlitroConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// `load_from_file` when a path is given, `load` otherwise.
    pub fn load_with_override(path: Option<&Path>) -> Result<FlitroConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        paths::global_config_path()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn default() -> FlitroConfig {
        FlitroConfig::default()
    }
}
