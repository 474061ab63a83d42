//! # LayerFlow Config
//!
//! Runtime configuration (`layerflow.toml`) for the LayerFlow binary.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
