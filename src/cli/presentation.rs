//! CLI presentation: per-file reports as text or JSON.

use crate::error::UpdateError;
use crate::update::UpdateOutcome;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

/// What happened to one target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Unchanged,
    Installed,
    Outdated,
    UpToDate,
    Failed,
}

impl From<UpdateOutcome> for FileStatus {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Written => FileStatus::Written,
            UpdateOutcome::Unchanged => FileStatus::Unchanged,
        }
    }
}

impl FileStatus {
    fn label(self) -> &'static str {
        match self {
            FileStatus::Written => "updated",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Installed => "installed",
            FileStatus::Outdated => "outdated",
            FileStatus::UpToDate => "up to date",
            FileStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub target: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(target: PathBuf, status: FileStatus) -> Self {
        Self {
            target,
            status,
            error: None,
        }
    }

    pub fn failed(target: PathBuf, error: String) -> Self {
        Self {
            target,
            status: FileStatus::Failed,
            error: Some(error),
        }
    }
}

pub fn format_reports(reports: &[FileReport], format: &str, color: bool) -> Result<String, UpdateError> {
    match format {
        "json" => format_reports_json(reports),
        "text" => Ok(format_reports_text(reports, color)),
        other => Err(UpdateError::ConfigError(format!(
            "Invalid output format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

pub fn format_reports_json(reports: &[FileReport]) -> Result<String, UpdateError> {
    let out = serde_json::json!({ "files": reports });
    serde_json::to_string_pretty(&out)
        .map_err(|e| UpdateError::ConfigError(format!("Failed to encode report: {}", e)))
}

pub fn format_reports_text(reports: &[FileReport], color: bool) -> String {
    if reports.is_empty() {
        return "No files to update.".to_string();
    }
    reports
        .iter()
        .map(|report| {
            let label = format!("{:>10}", report.status.label());
            let label = if color { paint(&label, report.status) } else { label };
            match &report.error {
                Some(error) => format!("{} {}: {}", label, report.target.display(), error),
                None => format!("{} {}", label, report.target.display()),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint(label: &str, status: FileStatus) -> String {
    match status {
        FileStatus::Written | FileStatus::Installed => label.green().bold().to_string(),
        FileStatus::Unchanged | FileStatus::UpToDate => label.dimmed().to_string(),
        FileStatus::Outdated => label.yellow().bold().to_string(),
        FileStatus::Failed => label.red().bold().to_string(),
    }
}
