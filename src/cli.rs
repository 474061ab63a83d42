//! CLI definitions for LayerFlow.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use layerflow_config::{Config, ConfigLoader};

/// LayerFlow CLI.
#[derive(Parser)]
#[command(name = "layerflow")]
#[command(about = "Build and run component graphs from configuration folders")]
#[command(version)]
pub(crate) struct Cli {
    /// Runtime configuration file path
    #[arg(short, long, default_value = "layerflow.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where component configuration files come from.
#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// Object folder scanned recursively (overrides resolver.conf_dir)
    #[arg(long)]
    pub conf_dir: Option<PathBuf>,
}

impl SourceArgs {
    /// Apply the command-line overrides to `config`, expanding `~`.
    pub(crate) fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.conf_dir {
            let expanded = ConfigLoader::expand_path(&dir.to_string_lossy());
            config.resolver.conf_dir = Some(PathBuf::from(expanded));
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build, then handle each root with a fresh context
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Record and print per-component durations
        #[arg(long)]
        show_duration: bool,

        /// Seed the context, e.g. `--set region=eu` (JSON values are parsed)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, Value)>,

        /// Names to run (defaults to execution.roots)
        roots: Vec<String>,
    },

    /// Construct each root without running it
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Names to construct (defaults to execution.roots)
        roots: Vec<String>,
    },

    /// Print indexed names with their declared types
    List {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Commands {
    pub(crate) fn source(&self) -> &SourceArgs {
        match self {
            Commands::Run { source, .. } | Commands::Check { source, .. } | Commands::List { source } => source,
        }
    }
}

/// Parse `key=value`. The value is read as JSON when it parses, as a plain
/// string otherwise.
fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
