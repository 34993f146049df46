//! Error types for the YAML configuration updater.

use std::path::PathBuf;
use thiserror::Error;

/// Document model errors (parsing and dumping YAML)
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("YAML parse error: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Document root must be a mapping, found {0}")]
    NotAMapping(String),

    #[error("YAML serialization error: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Why an ignored section could not be resolved in the target document.
///
/// Each variant carries the path up to and including the first segment that
/// failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IgnoredSectionFault {
    #[error("'{0}' does not exist in the target")]
    Missing(String),

    #[error("'{0}' is not a section, cannot descend into it")]
    ParentNotSection(String),

    #[error("'{0}' is a value, ignored sections must be a section")]
    NotASection(String),
}

/// Update errors surfaced to callers of the updater
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Target file does not exist: {0:?}")]
    TargetMissing(PathBuf),

    #[error("Invalid ignored section '{path}': {fault}")]
    InvalidIgnoredSection {
        path: String,
        fault: IgnoredSectionFault,
    },

    #[error("Template resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl UpdateError {
    pub(crate) fn ignored(path: &str, fault: IgnoredSectionFault) -> Self {
        UpdateError::InvalidIgnoredSection {
            path: path.to_string(),
            fault,
        }
    }
}

impl From<config::ConfigError> for UpdateError {
    fn from(err: config::ConfigError) -> Self {
        UpdateError::ConfigError(err.to_string())
    }
}
