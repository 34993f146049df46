//! yamlmend CLI Binary
//!
//! Command-line interface for updating YAML configuration files from a template.

use clap::Parser;
use std::process;
use tracing::{error, info};
use yamlmend::cli::{map_error, Cli, Commands, RunContext, EXIT_FAILURE};
use yamlmend::config::ConfigLoader;
use yamlmend::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_FAILURE);
    }

    info!(command = cli.command.name(), "yamlmend starting");

    let context = match RunContext::new(cli.project.clone(), cli.config.clone(), cli.separator) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            // Rendered documents already end with a newline
            if matches!(cli.command, Commands::Render { .. }) {
                print!("{}", output.body);
            } else {
                println!("{}", output.body);
            }
            process::exit(output.code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.project)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}
