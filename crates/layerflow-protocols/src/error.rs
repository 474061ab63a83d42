//! Resolution errors.

use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

use crate::category::Category;

/// Contradictions in the identity of a type or component.
///
/// These are never retried: the configuration graph must be fixed first.
#[derive(Debug, Error)]
pub enum IdentityConflict {
    #[error("Type {0} is already registered")]
    TypeAlreadyRegistered(String),

    #[error("Component name {name} has already been used, type is {type_name}")]
    NameAlreadyUsed { name: String, type_name: String },

    #[error("Component name {0} is already taken")]
    NameTaken(String),

    #[error("{category} {name} is already registered")]
    AlreadyRegistered { category: Category, name: String },

    #[error("Component name is empty for type {0}")]
    EmptyName(String),
}

/// Errors raised while indexing, constructing or resolving components.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Fatal identity conflict: {0}")]
    Fatal(#[from] IdentityConflict),

    #[error("Unknown component type: {0}")]
    UnknownType(String),

    #[error("{name}: {category}'s configuration is not set")]
    ConfigNotSet { category: Category, name: String },

    #[error("Component {0} not found")]
    NotFound(String),

    #[error("Object name {0} not found")]
    ObjectNameNotFound(String),

    #[error("Configuration name {name} already exists, path is {} (conflicting path {})", .existing.display(), .conflicting.display())]
    DuplicateName {
        name: String,
        existing: PathBuf,
        conflicting: PathBuf,
    },

    #[error("Configuration path {} is a directory, not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("Cannot derive a component name from {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("{category} name ({reported}) mismatch with configuration name ({expected}) from {origin}")]
    NameMismatch {
        category: Category,
        reported: String,
        expected: String,
        origin: String,
    },

    #[error("Configuration {} must have a type field", .0.display())]
    MissingType(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration in {origin}: {message}")]
    Malformed { origin: String, message: String },

    #[error("Component {name} is not a {expected}")]
    CapabilityMismatch { name: String, expected: Category },

    #[error("{owner}: {member} already exists")]
    DuplicateMember { owner: String, member: String },

    #[error("Component {type_name} failed to load configuration: {message}")]
    ComponentConfig { type_name: String, message: String },

    #[error("Dependency cycle detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

impl ResolveError {
    /// Whether this error signals an unrecoverable identity conflict.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolveError::Fatal(_))
    }

    /// Build a [`ResolveError::Malformed`] from any parser error.
    pub fn malformed(origin: impl Display, err: impl Display) -> Self {
        ResolveError::Malformed {
            origin: origin.to_string(),
            message: err.to_string(),
        }
    }

    /// Build a [`ResolveError::ComponentConfig`].
    pub fn component_config(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::ComponentConfig {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}
