//! Name to configuration-file index.
//!
//! A component's name is the stem of its configuration file: `conf/main.yaml`
//! indexes `main`. Indexes only grow; a name indexed twice is an error that
//! reports both paths.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;
use walkdir::WalkDir;

use layerflow_protocols::ResolveError;

/// Append-only map from component name to configuration path.
#[derive(Debug, Default)]
pub struct ConfigIndex {
    paths: RwLock<BTreeMap<String, PathBuf>>,
}

impl ConfigIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a single file.
    pub fn index_file(&self, path: &Path) -> Result<String, ResolveError> {
        let metadata = path.metadata().map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            return Err(ResolveError::NotAFile(path.to_path_buf()));
        }
        let name = conf_name(path)?;
        self.insert(name.clone(), path.to_path_buf())?;
        Ok(name)
    }

    /// Index every file directly inside `folder`. Subfolders are skipped.
    pub fn index_folder(&self, folder: &Path) -> Result<Vec<String>, ResolveError> {
        self.index_walk(folder, Some(1))
    }

    /// Index every file below `folder`, at any depth.
    pub fn index_tree(&self, folder: &Path) -> Result<Vec<String>, ResolveError> {
        self.index_walk(folder, None)
    }

    fn index_walk(&self, folder: &Path, max_depth: Option<usize>) -> Result<Vec<String>, ResolveError> {
        let mut walker = WalkDir::new(folder).min_depth(1).sort_by_file_name();
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut names = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| ResolveError::Io {
                path: folder.to_path_buf(),
                source: io::Error::from(e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = conf_name(entry.path())?;
            self.insert(name.clone(), entry.path().to_path_buf())?;
            names.push(name);
        }

        debug!(folder = %folder.display(), count = names.len(), "Indexed configuration folder");
        Ok(names)
    }

    fn insert(&self, name: String, path: PathBuf) -> Result<(), ResolveError> {
        let mut paths = self.paths.write();
        if let Some(existing) = paths.get(&name) {
            return Err(ResolveError::DuplicateName {
                name,
                existing: existing.clone(),
                conflicting: path,
            });
        }
        paths.insert(name, path);
        Ok(())
    }

    /// Configuration path for `name`.
    pub fn path(&self, name: &str) -> Option<PathBuf> {
        self.paths.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.paths.read().contains_key(name)
    }

    /// Indexed names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.paths.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.paths.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.read().is_empty()
    }

    pub fn clear(&self) {
        self.paths.write().clear();
    }
}

/// Derive a component name from a file path (its stem).
pub fn conf_name(path: &Path) -> Result<String, ResolveError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ResolveError::InvalidPath(path.to_path_buf()))
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
