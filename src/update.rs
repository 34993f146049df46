//! Update orchestrator
//!
//! Loads the template and the target, runs the merge passes and writes the
//! target only when the merged text differs from what is on disk.

use crate::document::{Document, LoadedDocument};
use crate::error::UpdateError;
use crate::merge::{comments, ignored, keypath, writer};
use crate::source::TemplateSource;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// What an update did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Written,
    Unchanged,
}

impl UpdateOutcome {
    pub fn changed(self) -> bool {
        self == UpdateOutcome::Written
    }
}

/// Merges a template into target files. Holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct ConfigUpdater {
    separator: char,
}

impl Default for ConfigUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigUpdater {
    pub fn new() -> Self {
        Self {
            separator: keypath::DEFAULT_SEPARATOR,
        }
    }

    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Bring `target` up to date with `template`, keeping the target's values
    /// and copying the `ignored` sections verbatim.
    ///
    /// The target must already exist. Nothing is written when the merged text
    /// equals the current content.
    #[instrument(skip_all, fields(template = %template.describe(), path = %target.display()))]
    pub fn update<S: AsRef<str>>(
        &self,
        template: &TemplateSource<'_>,
        target: &Path,
        ignored: &[S],
    ) -> Result<UpdateOutcome, UpdateError> {
        if !target.is_file() {
            return Err(UpdateError::TargetMissing(target.to_path_buf()));
        }

        let template = template.load()?;
        let current = read_text(target)?;
        let merged = self.merge(&template, &current, ignored)?;

        if merged == current {
            debug!("Target already up to date");
            return Ok(UpdateOutcome::Unchanged);
        }

        write_atomic(target, &merged)?;
        info!(bytes = merged.len(), "Updated configuration file");
        Ok(UpdateOutcome::Written)
    }

    /// Whether [`ConfigUpdater::update`] would rewrite `target`. Never writes.
    #[instrument(skip_all, fields(template = %template.describe(), path = %target.display()))]
    pub fn needs_update<S: AsRef<str>>(
        &self,
        template: &TemplateSource<'_>,
        target: &Path,
        ignored: &[S],
    ) -> Result<bool, UpdateError> {
        if !target.is_file() {
            return Err(UpdateError::TargetMissing(target.to_path_buf()));
        }
        let template = template.load()?;
        let current = read_text(target)?;
        Ok(self.merge(&template, &current, ignored)? != current)
    }

    /// The merged text for an in-memory target, without touching any file.
    pub fn render<S: AsRef<str>>(
        &self,
        template: &TemplateSource<'_>,
        target: &str,
        ignored: &[S],
    ) -> Result<String, UpdateError> {
        let template = template.load()?;
        self.merge(&template, &normalize_newlines(target), ignored)
    }

    /// Write the template's raw text to `target` if it does not exist yet.
    /// Returns whether a file was created.
    #[instrument(skip_all, fields(template = %template.describe(), path = %target.display()))]
    pub fn install_default(
        &self,
        template: &TemplateSource<'_>,
        target: &Path,
    ) -> Result<bool, UpdateError> {
        if target.exists() {
            return Ok(false);
        }
        let raw = template.read()?;
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(target) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        file.write_all(raw.as_bytes())?;
        info!("Installed default configuration");
        Ok(true)
    }

    fn merge<S: AsRef<str>>(
        &self,
        template: &LoadedDocument,
        target_raw: &str,
        ignored: &[S],
    ) -> Result<String, UpdateError> {
        let target = Document::parse(target_raw)?;
        let comments = comments::extract(&template.raw, &template.document, self.separator);
        let sections = ignored::extract(target_raw, &target, ignored, self.separator)?;
        Ok(writer::write(
            &template.document,
            &target,
            &comments,
            &sections,
            self.separator,
        )?)
    }
}

/// Update `target` with the default separator.
pub fn update<S: AsRef<str>>(
    template: &TemplateSource<'_>,
    target: &Path,
    ignored: &[S],
) -> Result<UpdateOutcome, UpdateError> {
    ConfigUpdater::new().update(template, target, ignored)
}

fn read_text(path: &Path) -> Result<String, UpdateError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(normalize_newlines(&text))
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Write through a uniquely named temp file beside the real file and rename
/// it into place. Symlinks are followed and existing permissions are kept.
/// The temp file is removed when anything fails.
fn write_atomic(path: &Path, text: &str) -> Result<(), UpdateError> {
    let path = resolve_link(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(text.as_bytes())?;
    if let Ok(metadata) = fs::metadata(&path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.persist(&path).map_err(|e| e.error)?;
    Ok(())
}

fn resolve_link(path: &Path) -> Result<PathBuf, UpdateError> {
    let is_link = fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false);
    if is_link {
        Ok(fs::canonicalize(path)?)
    } else {
        Ok(path.to_path_buf())
    }
}
