//! Configuration validation.

use std::collections::HashSet;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_folders(config, &mut result);
        Self::validate_execution(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_folders(config: &Config, result: &mut ValidationResult) {
        match &config.resolver.conf_dir {
            Some(dir) => Self::check_dir("resolver.conf_dir", dir, result),
            None if config.folders.entries().is_empty() => {
                result.add_warning(ValidationWarning::new(
                    "resolver.conf_dir",
                    "No configuration folder set, only naming-convention components can be resolved",
                ));
            }
            None => {}
        }

        for (key, folder) in config.folders.entries() {
            Self::check_dir(&format!("folders.{}", key), folder, result);
        }
    }

    fn check_dir(path: &str, dir: &Path, result: &mut ValidationResult) {
        if !dir.exists() {
            result.add_error(ValidationError::new(
                path,
                format!("Folder does not exist: {}", dir.display()),
            ));
        } else if !dir.is_dir() {
            result.add_error(ValidationError::new(
                path,
                format!("Not a folder: {}", dir.display()),
            ));
        }
    }

    fn validate_execution(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for root in &config.execution.roots {
            if root.is_empty() {
                result.add_error(ValidationError::new("execution.roots", "Root name cannot be empty"));
            } else if !seen.insert(root.as_str()) {
                result.add_error(ValidationError::new(
                    "execution.roots",
                    format!("Root '{}' is listed twice", root),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        // Same parser the subscriber uses, so any directive list it accepts passes.
        let level = &config.logging.level;
        if let Err(e) = EnvFilter::try_new(level) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!("Invalid log filter '{}': {}", level, e),
            ));
        } else {
            for directive in level.split(',').map(str::trim) {
                if !directive.is_empty() && !directive.contains('=') && directive.parse::<LevelFilter>().is_err() {
                    result.add_warning(ValidationWarning::new(
                        "logging.level",
                        format!("'{}' is not a level and will be read as a target filter", directive),
                    ));
                }
            }
        }

        if config.logging.json && config.logging.dir.is_none() {
            result.add_warning(ValidationWarning::new(
                "logging.json",
                "JSON output only applies to the file log, but logging.dir is not set",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
