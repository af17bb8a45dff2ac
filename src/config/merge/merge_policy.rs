//! Merge rules: defaults first, then sources in precedence order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("activation.default_policy", "replace")?
        .set_default("activation.safari_startup_delay_ms", 500)?
        .set_default("activation.dry_run", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "file")
}
