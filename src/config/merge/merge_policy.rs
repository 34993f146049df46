//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for environment overrides, e.g. `YAMLMEND__SEPARATOR=/`.
pub const ENV_PREFIX: &str = "YAMLMEND";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("separator", ".")?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}

/// Environment variables override every file source.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}
