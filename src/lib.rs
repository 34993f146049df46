//! yamlmend: Comment-Preserving YAML Configuration Updates
//!
//! Merges a bundled template into a user's configuration file. The template
//! decides which keys exist and in what order, the user's file keeps its
//! values, and sections marked as ignored are copied over untouched.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod merge;
pub mod source;
pub mod update;

pub use document::{Document, LoadedDocument};
pub use error::{DocumentError, IgnoredSectionFault, UpdateError};
pub use source::{DirectoryResources, EmbeddedResources, ResourceProvider, TemplateSource};
pub use update::{update, ConfigUpdater, UpdateOutcome};
