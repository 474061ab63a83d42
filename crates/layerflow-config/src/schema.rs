//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub folders: FoldersConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Global object folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Folder scanned recursively for component configuration files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf_dir: Option<PathBuf>,
}

/// Optional per-category folders. Each is scanned non-recursively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoldersConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub divider: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_center: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler_group: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_handler_group: Option<PathBuf>,
}

impl FoldersConfig {
    /// Configured folders as `(key, path)` pairs, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, &Path)> {
        [
            ("handler", &self.handler),
            ("divider", &self.divider),
            ("layer", &self.layer),
            ("layer_center", &self.layer_center),
            ("handler_group", &self.handler_group),
            ("async_handler_group", &self.async_handler_group),
        ]
        .into_iter()
        .filter_map(|(key, path)| path.as_deref().map(|p| (key, p)))
        .collect()
    }
}

/// Execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Record and log per-component durations.
    #[serde(default)]
    pub show_duration: bool,

    /// Construct every category-folder component at startup.
    #[serde(default)]
    pub eager: bool,

    /// Names run when none are given on the command line.
    #[serde(default)]
    pub roots: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Write the file log as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
