//! CLI route: single route table and run context. Dispatches to the updater and presentation.

use crate::cli::output::{EXIT_FAILURE, EXIT_OK, EXIT_OUTDATED};
use crate::cli::parse::{Commands, MergeArgs};
use crate::cli::presentation::{format_reports, FileReport, FileStatus};
use crate::config::{ConfigLoader, JobConfig, UpdaterConfig};
use crate::error::UpdateError;
use crate::source::TemplateSource;
use crate::update::ConfigUpdater;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Text to print and the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub body: String,
    pub code: i32,
}

impl CommandOutput {
    fn ok(body: String) -> Self {
        Self {
            body,
            code: EXIT_OK,
        }
    }
}

/// Runtime context for CLI execution: loaded configuration and the updater.
/// Built from the project path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: UpdaterConfig,
    updater: ConfigUpdater,
    color: bool,
}

impl RunContext {
    /// Create run context. `separator` overrides the configured one.
    pub fn new(
        project_root: PathBuf,
        config_path: Option<PathBuf>,
        separator: Option<char>,
    ) -> Result<Self, UpdateError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&project_root)?
        };
        Self::from_config(config, separator)
    }

    pub fn from_config(config: UpdaterConfig, separator: Option<char>) -> Result<Self, UpdateError> {
        let separator = match separator {
            Some(separator) => separator,
            None => config.separator_char()?,
        };
        Ok(Self {
            updater: ConfigUpdater::with_separator(separator),
            color: config.logging.color && std::io::stdout().is_terminal(),
            config,
        })
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, UpdateError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        debug!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, UpdateError> {
        match command {
            Commands::Update {
                merge,
                create,
                format,
            } => {
                let report = self.update_file(
                    &merge.template,
                    &merge.target,
                    &merge.ignored,
                    *create,
                )?;
                let body = format_reports(&[report], format, self.color)?;
                Ok(CommandOutput::ok(body))
            }
            Commands::Check { merge, format } => {
                let report = self.check_file(merge)?;
                let code = if report.status == FileStatus::Outdated {
                    EXIT_OUTDATED
                } else {
                    EXIT_OK
                };
                let body = format_reports(&[report], format, self.color)?;
                Ok(CommandOutput { body, code })
            }
            Commands::Render { merge } => {
                let body = self.render_file(merge)?;
                Ok(CommandOutput::ok(body))
            }
            Commands::Run { format } => self.run_jobs(format),
        }
    }

    fn update_file(
        &self,
        template: &Path,
        target: &Path,
        ignored: &[String],
        create: bool,
    ) -> Result<FileReport, UpdateError> {
        let source = TemplateSource::file(template);
        if create && self.updater.install_default(&source, target)? {
            return Ok(FileReport::new(target.to_path_buf(), FileStatus::Installed));
        }
        let outcome = self.updater.update(&source, target, ignored)?;
        Ok(FileReport::new(target.to_path_buf(), outcome.into()))
    }

    fn check_file(&self, merge: &MergeArgs) -> Result<FileReport, UpdateError> {
        let source = TemplateSource::file(&merge.template);
        let status = if self
            .updater
            .needs_update(&source, &merge.target, &merge.ignored)?
        {
            FileStatus::Outdated
        } else {
            FileStatus::UpToDate
        };
        Ok(FileReport::new(merge.target.clone(), status))
    }

    fn render_file(&self, merge: &MergeArgs) -> Result<String, UpdateError> {
        if !merge.target.is_file() {
            return Err(UpdateError::TargetMissing(merge.target.clone()));
        }
        let target = std::fs::read_to_string(&merge.target)?;
        self.updater
            .render(&TemplateSource::file(&merge.template), &target, &merge.ignored)
    }

    /// Every configured job runs even when an earlier one fails.
    fn run_jobs(&self, format: &str) -> Result<CommandOutput, UpdateError> {
        if self.config.jobs.is_empty() {
            warn!("No jobs configured");
        }
        let reports: Vec<FileReport> = self.config.jobs.iter().map(|job| self.run_job(job)).collect();
        let failed = reports
            .iter()
            .filter(|report| report.status == FileStatus::Failed)
            .count();
        info!(jobs = reports.len(), failed, "Finished configured jobs");

        let body = format_reports(&reports, format, self.color)?;
        let code = if failed > 0 { EXIT_FAILURE } else { EXIT_OK };
        Ok(CommandOutput { body, code })
    }

    fn run_job(&self, job: &JobConfig) -> FileReport {
        match self.update_file(&job.template, &job.target, &job.ignored, job.create_missing) {
            Ok(report) => report,
            Err(e) => {
                warn!(file = %job.target.display(), error = %e, "Job failed");
                FileReport::failed(job.target.clone(), crate::cli::output::map_error(&e))
            }
        }
    }
}
