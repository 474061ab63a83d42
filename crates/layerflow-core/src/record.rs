//! Component configuration records.
//!
//! A record is a YAML document with a mandatory `type` field. Everything else
//! belongs to the component that `type` names.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use layerflow_protocols::ResolveError;

#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    type_name: Option<String>,
}

/// Read a configuration file.
pub fn read(path: &Path) -> Result<Vec<u8>, ResolveError> {
    fs::read(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract the declared `type` of a record.
pub fn declared_type(raw: &[u8], path: &Path) -> Result<String, ResolveError> {
    let tag: TypeTag = parse(raw, path.display())?;
    match tag.type_name {
        Some(type_name) if !type_name.is_empty() => Ok(type_name),
        _ => Err(ResolveError::MissingType(path.to_path_buf())),
    }
}

/// Decode a record into a component's configuration struct.
///
/// Empty input decodes to `T::default()`; components built by naming
/// convention receive no configuration at all.
pub fn decode<T>(raw: &[u8], origin: &str) -> Result<T, ResolveError>
where
    T: DeserializeOwned + Default,
{
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse(raw, origin)
}

fn parse<T: DeserializeOwned>(raw: &[u8], origin: impl std::fmt::Display) -> Result<T, ResolveError> {
    let text = std::str::from_utf8(raw).map_err(|e| ResolveError::malformed(&origin, e))?;
    serde_yml::from_str(text).map_err(|e| ResolveError::malformed(&origin, e))
}
