//! LayerFlow: build component graphs from configuration folders and run them.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};

use layerflow_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::commands::Outcome;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match ConfigLoader::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", cli.config.display(), e);
            return Outcome::Failed.exit_code();
        }
    };
    cli.command.source().apply(&mut config);

    if let Err(e) = logging::init_tracing(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if !validate(&config) {
        return Outcome::Failed.exit_code();
    }

    let outcome = match cli.command {
        Commands::Run {
            show_duration,
            set,
            roots,
            ..
        } => {
            let show_duration = show_duration || config.execution.show_duration;
            commands::run(&config, &roots, show_duration, &set).await
        }
        Commands::Check { roots, .. } => commands::check(&config, &roots),
        Commands::List { .. } => commands::list(&config),
    };
    outcome.exit_code()
}

fn validate(config: &Config) -> bool {
    let result = match ConfigValidator::validate(config) {
        Ok(result) => result,
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            return false;
        }
    };
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for err in &result.errors {
        error!(path = %err.path, "{}", err.message);
    }
    result.is_valid()
}
