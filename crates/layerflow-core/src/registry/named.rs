//! Per-category registry of named components.
//!
//! Each category keeps two maps: name→configuration path and name→live
//! instance. A cache miss on [`NamedRegistry::get`] reads the configured file,
//! hands its declared `type` to the [`TypeRegistry`] and caches the result.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use layerflow_protocols::{Category, Divider, Handler, Instance, Resolve, ResolveError};

use super::base::BaseRegistry;
use crate::factory::TypeRegistry;
use crate::index::ConfigIndex;
use crate::record;

/// Execution capability a category stores its instances as.
pub trait Capability: Send + Sync + 'static {
    /// Category reported when an instance lacks this capability.
    const KIND: Category;

    fn from_instance(instance: &Instance) -> Option<Arc<Self>>;

    fn to_instance(item: Arc<Self>) -> Instance;
}

impl Capability for dyn Handler {
    const KIND: Category = Category::Handler;

    fn from_instance(instance: &Instance) -> Option<Arc<Self>> {
        instance.as_handler()
    }

    fn to_instance(item: Arc<Self>) -> Instance {
        Instance::Handler(item)
    }
}

impl Capability for dyn Divider {
    const KIND: Category = Category::Divider;

    fn from_instance(instance: &Instance) -> Option<Arc<Self>> {
        instance.as_divider()
    }

    fn to_instance(item: Arc<Self>) -> Instance {
        Instance::Divider(item)
    }
}

/// Name-keyed registry for one category.
pub struct NamedRegistry<T: ?Sized + Capability> {
    category: Category,
    instances: BaseRegistry<T>,
    conf_paths: ConfigIndex,
}

impl<T: ?Sized + Capability> NamedRegistry<T> {
    /// Create an empty registry for `category`.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            instances: BaseRegistry::new(category),
            conf_paths: ConfigIndex::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Index every file directly inside `folder` without constructing anything.
    pub fn index_folder(&self, folder: &Path) -> Result<Vec<String>, ResolveError> {
        self.conf_paths.index_folder(folder)
    }

    /// Index one file without constructing it.
    pub fn index_file(&self, path: &Path) -> Result<String, ResolveError> {
        self.conf_paths.index_file(path)
    }

    /// Index `folder` and construct every newly indexed name.
    pub fn load_folder(
        &self,
        folder: &Path,
        types: &TypeRegistry,
        resolver: &dyn Resolve,
    ) -> Result<Vec<String>, ResolveError> {
        let names = self.index_folder(folder)?;
        for name in &names {
            self.get(name, types, resolver)?;
        }
        Ok(names)
    }

    /// Index one file and construct it immediately.
    pub fn create_with_conf_path(
        &self,
        path: &Path,
        types: &TypeRegistry,
        resolver: &dyn Resolve,
    ) -> Result<Arc<T>, ResolveError> {
        let name = self.index_file(path)?;
        self.get(&name, types, resolver)
    }

    /// Get `name`, constructing it from its configuration file on a cache miss.
    pub fn get(
        &self,
        name: &str,
        types: &TypeRegistry,
        resolver: &dyn Resolve,
    ) -> Result<Arc<T>, ResolveError> {
        if let Some(item) = self.instances.get(name) {
            return Ok(item);
        }

        let item = self.construct(name, types, resolver)?;
        self.instances.register(name, item.clone())?;
        debug!(category = %self.category, name, "Registered component");
        Ok(item)
    }

    /// Register a code-constructed instance.
    pub fn register(&self, name: &str, item: Arc<T>) -> Result<(), ResolveError> {
        self.instances.register(name, item)?;
        Ok(())
    }

    /// Register an erased instance, checking its capability first.
    pub fn register_instance(&self, name: &str, instance: &Instance) -> Result<(), ResolveError> {
        let item = T::from_instance(instance).ok_or_else(|| ResolveError::CapabilityMismatch {
            name: name.to_string(),
            expected: T::KIND,
        })?;
        self.register(name, item)
    }

    /// Whether `name` is constructed or indexed in this category.
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains(name) || self.conf_paths.contains(name)
    }

    /// Configuration path indexed for `name`.
    pub fn conf_path(&self, name: &str) -> Option<std::path::PathBuf> {
        self.conf_paths.path(name)
    }

    /// Names of constructed instances, sorted.
    pub fn names(&self) -> Vec<String> {
        self.instances.names()
    }

    /// Names with an indexed configuration file, sorted.
    pub fn indexed_names(&self) -> Vec<String> {
        self.conf_paths.names()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Forget every instance and every indexed path.
    pub fn reset_environment(&self) {
        self.instances.clear();
        self.conf_paths.clear();
    }

    fn construct(
        &self,
        name: &str,
        types: &TypeRegistry,
        resolver: &dyn Resolve,
    ) -> Result<Arc<T>, ResolveError> {
        let path = self
            .conf_paths
            .path(name)
            .ok_or_else(|| ResolveError::ConfigNotSet {
                category: self.category,
                name: name.to_string(),
            })?;

        let raw = record::read(&path)?;
        let type_name = record::declared_type(&raw, &path)?;
        let instance = types.instantiate(&type_name, &raw, resolver)?;

        let item = T::from_instance(&instance).ok_or_else(|| ResolveError::CapabilityMismatch {
            name: instance.name().to_string(),
            expected: T::KIND,
        })?;

        if instance.name() != name {
            return Err(ResolveError::NameMismatch {
                category: self.category,
                reported: instance.name().to_string(),
                expected: name.to_string(),
                origin: path.display().to_string(),
            });
        }
        Ok(item)
    }
}

/// Leaf handlers.
pub type HandlerRegistry = NamedRegistry<dyn Handler>;
/// Routing predicates.
pub type DividerRegistry = NamedRegistry<dyn Divider>;
/// Divider + named handler set.
pub type LayerRegistry = NamedRegistry<dyn Handler>;
/// Ordered layer stacks.
pub type LayerCenterRegistry = NamedRegistry<dyn Handler>;
/// Ordered handler chains.
pub type HandlerGroupRegistry = NamedRegistry<dyn Handler>;
/// Concurrent handler fan-outs.
pub type AsyncHandlerGroupRegistry = NamedRegistry<dyn Handler>;

#[cfg(test)]
#[path = "named_tests.rs"]
mod tests;
