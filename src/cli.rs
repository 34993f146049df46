//! CLI domain: parse, route, output, and presentation only.
//! No merge logic; single route table dispatches to the updater.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, EXIT_FAILURE, EXIT_OK, EXIT_OUTDATED};
pub use parse::{Cli, Commands, MergeArgs};
pub use presentation::{
    format_reports, format_reports_json, format_reports_text, FileReport, FileStatus,
};
pub use route::{CommandOutput, RunContext};
