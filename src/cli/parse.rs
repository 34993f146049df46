//! CLI parse: clap types for yamlmend. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// yamlmend CLI - Comment-preserving YAML configuration updates
#[derive(Parser, Debug)]
#[command(name = "yamlmend")]
#[command(about = "Bring YAML configuration files up to date with a template, keeping comments and user values")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory holding yamlmend.toml
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Key path separator used in --ignore paths
    #[arg(long)]
    pub separator: Option<char>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// A template, a target and the sections to leave alone.
#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Template document
    #[arg(long)]
    pub template: PathBuf,

    /// Configuration file to update
    #[arg(long)]
    pub target: PathBuf,

    /// Key path of a section copied verbatim from the target (repeatable)
    #[arg(long = "ignore", value_name = "PATH")]
    pub ignored: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge the template into the target and write it if it changed
    Update {
        #[command(flatten)]
        merge: MergeArgs,

        /// Install the template when the target does not exist
        #[arg(long)]
        create: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Report whether the target is up to date (exit code 2 when it is not)
    Check {
        #[command(flatten)]
        merge: MergeArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the merged document without writing it
    Render {
        #[command(flatten)]
        merge: MergeArgs,
    },
    /// Run every job from the configuration
    Run {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Commands {
    /// Stable command name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Update { .. } => "update",
            Commands::Check { .. } => "check",
            Commands::Render { .. } => "render",
            Commands::Run { .. } => "run",
        }
    }
}
