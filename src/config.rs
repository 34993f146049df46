//! Configuration System
//!
//! Layered configuration for the `yamlmend` tool: built-in defaults, the
//! global config file, the project's `yamlmend.toml`, then `YAMLMEND__*`
//! environment variables. Tests included.

use crate::error::UpdateError;
use crate::logging::LoggingConfig;
use config::File;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use merge::merge_policy::ENV_PREFIX;
pub use sources::global_file::global_config_path;
pub use sources::project_file::{project_config_path, PROJECT_FILE_NAME};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Key path separator, a single character
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Files to bring up to date on `yamlmend run`
    #[serde(default)]
    pub jobs: Vec<JobConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One template/target pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub template: PathBuf,
    pub target: PathBuf,

    /// Key paths copied verbatim from the target
    #[serde(default)]
    pub ignored: Vec<String>,

    /// Install the template when the target does not exist yet
    #[serde(default)]
    pub create_missing: bool,
}

fn default_separator() -> String {
    ".".to_string()
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            jobs: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Separator(String),
    Job(usize, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Separator(msg) => write!(f, "Separator: {}", msg),
            ValidationError::Job(index, msg) => write!(f, "Job #{}: {}", index + 1, msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl JobConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.template.as_os_str().is_empty() {
            return Err("Template path cannot be empty".to_string());
        }
        if self.target.as_os_str().is_empty() {
            return Err("Target path cannot be empty".to_string());
        }
        if self.ignored.iter().any(|path| path.trim().is_empty()) {
            return Err("Ignored section paths cannot be empty".to_string());
        }
        Ok(())
    }

    fn resolve_against(&mut self, base: &Path) {
        if self.template.is_relative() {
            self.template = base.join(&self.template);
        }
        if self.target.is_relative() {
            self.target = base.join(&self.target);
        }
    }
}

impl UpdaterConfig {
    /// The configured separator as a character.
    pub fn separator_char(&self) -> Result<char, UpdateError> {
        let mut chars = self.separator.chars();
        match (chars.next(), chars.next()) {
            (Some(separator), None) => Ok(separator),
            _ => Err(UpdateError::ConfigError(format!(
                "Separator must be a single character, got {:?}",
                self.separator
            ))),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(UpdateError::ConfigError(msg)) = self.separator_char() {
            errors.push(ValidationError::Separator(msg));
        }

        for (index, job) in self.jobs.iter().enumerate() {
            if let Err(e) = job.validate() {
                errors.push(ValidationError::Job(index, e));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Make relative job paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for job in &mut self.jobs {
            job.resolve_against(base);
        }
    }
}

/// Builds an [`UpdaterConfig`] from its sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Built-in defaults only.
    pub fn default() -> UpdaterConfig {
        UpdaterConfig::default()
    }

    /// Load the layered configuration for a project directory. Relative job
    /// paths are resolved against `project_root`.
    pub fn load(project_root: &Path) -> Result<UpdaterConfig, UpdateError> {
        Self::load_with_global(project_root, global_config_path().as_deref())
    }

    /// Same as [`ConfigLoader::load`] with an explicit global file.
    pub fn load_with_global(
        project_root: &Path,
        global: Option<&Path>,
    ) -> Result<UpdaterConfig, UpdateError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder, global)?;
        let builder = sources::project_file::add_to_builder(builder, project_root)?;
        let settings = builder.add_source(merge::merge_policy::environment()).build()?;

        let mut config: UpdaterConfig = settings.try_deserialize()?;
        config.resolve_paths(project_root);
        Self::checked(config)
    }

    /// Load a single TOML file, ignoring every other source. Relative job
    /// paths are resolved against the file's directory.
    pub fn load_from_file(path: &Path) -> Result<UpdaterConfig, UpdateError> {
        if !path.is_file() {
            return Err(UpdateError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let settings = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?;

        let mut config: UpdaterConfig = settings.try_deserialize()?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Self::checked(config)
    }

    fn checked(config: UpdaterConfig) -> Result<UpdaterConfig, UpdateError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            UpdateError::ConfigError(messages.join("; "))
        })?;
        Ok(config)
    }
}
