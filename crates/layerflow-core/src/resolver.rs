//! Resolver: turns bare names into live components.
//!
//! The resolver owns the type registry, the global object index and one
//! registry per category. Composites receive it as `&dyn Resolve` while loading
//! their configuration, so resolving a root name builds its whole subgraph
//! depth-first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, debug_span};

use layerflow_protocols::{Category, Component, Divider, Handler, Instance, Resolve, ResolveError};

use crate::convention;
use crate::factory::TypeRegistry;
use crate::index::ConfigIndex;
use crate::record;
use crate::registry::{
    AsyncHandlerGroupRegistry, DividerRegistry, HandlerGroupRegistry, HandlerRegistry,
    LayerCenterRegistry, LayerRegistry, NamedRegistry,
};

/// Order in which categories are searched by [`Resolver::get_concrete`].
pub const LOOKUP_ORDER: [Category; 6] = [
    Category::AsyncHandlerGroup,
    Category::Handler,
    Category::Divider,
    Category::Layer,
    Category::LayerCenter,
    Category::HandlerGroup,
];

/// One category's registry, seen through its capability.
enum Slot<'a> {
    Handler(&'a NamedRegistry<dyn Handler>),
    Divider(&'a DividerRegistry),
}

/// The composition root.
pub struct Resolver {
    types: TypeRegistry,
    objects: ConfigIndex,
    handlers: HandlerRegistry,
    dividers: DividerRegistry,
    layers: LayerRegistry,
    layer_centers: LayerCenterRegistry,
    handler_groups: HandlerGroupRegistry,
    async_handler_groups: AsyncHandlerGroupRegistry,
    /// Names currently being materialized, outermost first.
    in_progress: Mutex<Vec<String>>,
}

impl Resolver {
    /// Create a resolver around an already-populated type registry.
    pub fn new(types: TypeRegistry) -> Self {
        Self {
            types,
            objects: ConfigIndex::new(),
            handlers: HandlerRegistry::new(Category::Handler),
            dividers: DividerRegistry::new(Category::Divider),
            layers: LayerRegistry::new(Category::Layer),
            layer_centers: LayerCenterRegistry::new(Category::LayerCenter),
            handler_groups: HandlerGroupRegistry::new(Category::HandlerGroup),
            async_handler_groups: AsyncHandlerGroupRegistry::new(Category::AsyncHandlerGroup),
            in_progress: Mutex::new(Vec::new()),
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Register a constructible type.
    pub fn register_type<C>(&self, type_name: &str) -> Result<(), ResolveError>
    where
        C: Component + Default + 'static,
    {
        self.types.register_default::<C>(type_name)
    }

    // ------------------------------------------------------------------
    // Global object index
    // ------------------------------------------------------------------

    /// Index every file below `folder` (recursively) as a generic object.
    pub fn index_conf_folder(&self, folder: &Path) -> Result<Vec<String>, ResolveError> {
        self.objects.index_tree(folder)
    }

    /// Index a single file as a generic object.
    pub fn index_conf_file(&self, path: &Path) -> Result<String, ResolveError> {
        self.objects.index_file(path)
    }

    /// Names in the global object index, sorted.
    pub fn object_names(&self) -> Vec<String> {
        self.objects.names()
    }

    pub fn object_path(&self, name: &str) -> Option<PathBuf> {
        self.objects.path(name)
    }

    /// Declared `type` of an indexed object.
    pub fn declared_type(&self, name: &str) -> Result<String, ResolveError> {
        let path = self
            .objects
            .path(name)
            .ok_or_else(|| ResolveError::ObjectNameNotFound(name.to_string()))?;
        let raw = record::read(&path)?;
        record::declared_type(&raw, &path)
    }

    // ------------------------------------------------------------------
    // Per-category access
    // ------------------------------------------------------------------

    fn slot(&self, category: Category) -> Slot<'_> {
        match category {
            Category::Handler => Slot::Handler(&self.handlers),
            Category::Divider => Slot::Divider(&self.dividers),
            Category::Layer => Slot::Handler(&self.layers),
            Category::LayerCenter => Slot::Handler(&self.layer_centers),
            Category::HandlerGroup => Slot::Handler(&self.handler_groups),
            Category::AsyncHandlerGroup => Slot::Handler(&self.async_handler_groups),
        }
    }

    /// Get `name` from one category, constructing it from that category's
    /// folder on a cache miss.
    pub fn get(&self, category: Category, name: &str) -> Result<Instance, ResolveError> {
        match self.slot(category) {
            Slot::Handler(registry) => registry.get(name, &self.types, self).map(Instance::Handler),
            Slot::Divider(registry) => registry.get(name, &self.types, self).map(Instance::Divider),
        }
    }

    /// Register a code-constructed component in one category.
    ///
    /// The name is claimed in the type registry first, so it stays unique
    /// across every category and no configuration file can take it later.
    pub fn register(&self, category: Category, name: &str, instance: &Instance) -> Result<(), ResolveError> {
        let capable = match self.slot(category) {
            Slot::Handler(_) => instance.as_handler().is_some(),
            Slot::Divider(_) => instance.as_divider().is_some(),
        };
        if !capable {
            return Err(ResolveError::CapabilityMismatch {
                name: name.to_string(),
                expected: category,
            });
        }

        self.types.claim(name, instance)?;
        self.insert(category, name, instance)
    }

    /// Register a code-constructed handler in the handler category.
    pub fn register_handler(&self, name: &str, handler: Arc<dyn Handler>) -> Result<(), ResolveError> {
        self.register(Category::Handler, name, &Instance::Handler(handler))
    }

    /// Register a code-constructed divider.
    pub fn register_divider(&self, name: &str, divider: Arc<dyn Divider>) -> Result<(), ResolveError> {
        self.register(Category::Divider, name, &Instance::Divider(divider))
    }

    /// File an instance the type registry already holds into one category.
    fn insert(&self, category: Category, name: &str, instance: &Instance) -> Result<(), ResolveError> {
        match self.slot(category) {
            Slot::Handler(registry) => registry.register_instance(name, instance),
            Slot::Divider(registry) => registry.register_instance(name, instance),
        }
    }

    /// Index one file into `category` and construct it.
    pub fn create_with_conf_path(&self, category: Category, path: &Path) -> Result<Instance, ResolveError> {
        match self.slot(category) {
            Slot::Handler(registry) => registry
                .create_with_conf_path(path, &self.types, self)
                .map(Instance::Handler),
            Slot::Divider(registry) => registry
                .create_with_conf_path(path, &self.types, self)
                .map(Instance::Divider),
        }
    }

    /// Index a flat category folder without constructing anything.
    pub fn index_folder(&self, category: Category, folder: &Path) -> Result<Vec<String>, ResolveError> {
        match self.slot(category) {
            Slot::Handler(registry) => registry.index_folder(folder),
            Slot::Divider(registry) => registry.index_folder(folder),
        }
    }

    /// Index a flat category folder and construct every file in it.
    pub fn load_folder(&self, category: Category, folder: &Path) -> Result<Vec<String>, ResolveError> {
        match self.slot(category) {
            Slot::Handler(registry) => registry.load_folder(folder, &self.types, self),
            Slot::Divider(registry) => registry.load_folder(folder, &self.types, self),
        }
    }

    /// Constructed names in one category, sorted.
    pub fn names(&self, category: Category) -> Vec<String> {
        match self.slot(category) {
            Slot::Handler(registry) => registry.names(),
            Slot::Divider(registry) => registry.names(),
        }
    }

    /// Names indexed in one category's folder, sorted.
    pub fn indexed_names(&self, category: Category) -> Vec<String> {
        match self.slot(category) {
            Slot::Handler(registry) => registry.indexed_names(),
            Slot::Divider(registry) => registry.indexed_names(),
        }
    }

    /// Forget every constructed component and every indexed path.
    ///
    /// Registered types survive.
    pub fn reset_environment(&self) {
        self.handlers.reset_environment();
        self.dividers.reset_environment();
        self.layers.reset_environment();
        self.layer_centers.reset_environment();
        self.handler_groups.reset_environment();
        self.async_handler_groups.reset_environment();
        self.objects.clear();
        self.types.reset_instances();
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Find `name` in any category.
    ///
    /// Categories are tried in [`LOOKUP_ORDER`]; a category that has never
    /// heard of the name is skipped, any other failure is returned as is.
    pub fn get_concrete(&self, name: &str) -> Result<Instance, ResolveError> {
        for category in LOOKUP_ORDER {
            match self.get(category, name) {
                Ok(instance) => return Ok(instance),
                Err(ResolveError::ConfigNotSet { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ResolveError::NotFound(name.to_string()))
    }

    /// Construct `name` from its object file, by declared type.
    fn materialize_object(&self, name: &str, path: &Path) -> Result<(), ResolveError> {
        let raw = record::read(path)?;
        let type_name = record::declared_type(&raw, path)?;

        match Category::from_tag(&type_name) {
            Some(category) => {
                self.create_with_conf_path(category, path)?;
                Ok(())
            }
            None => self.materialize_by_convention(name, &type_name, &raw, &path.display().to_string()),
        }
    }

    /// Instantiate `type_name` and file the result under the category its
    /// name implies.
    fn materialize_by_convention(
        &self,
        name: &str,
        type_name: &str,
        raw: &[u8],
        origin: &str,
    ) -> Result<(), ResolveError> {
        let category = convention::category_for(type_name)
            .ok_or_else(|| ResolveError::ObjectNameNotFound(name.to_string()))?;

        let instance = self.types.instantiate(type_name, raw, self)?;
        if instance.name() != name {
            return Err(ResolveError::NameMismatch {
                category,
                reported: instance.name().to_string(),
                expected: name.to_string(),
                origin: origin.to_string(),
            });
        }

        self.insert(category, name, &instance)?;
        debug!(%category, name, type_name, "Registered by naming convention");
        Ok(())
    }

    fn enter(&self, name: &str) -> Result<InProgress<'_>, ResolveError> {
        let mut stack = self.in_progress.lock();
        if let Some(start) = stack.iter().position(|n| n == name) {
            let mut chain = stack[start..].to_vec();
            chain.push(name.to_string());
            return Err(ResolveError::Cycle(chain));
        }
        stack.push(name.to_string());
        debug!(depth = stack.len(), name, "Materializing");
        Ok(InProgress {
            stack: &self.in_progress,
        })
    }
}

/// Pops the in-progress stack when a materialization ends, however it ends.
struct InProgress<'a> {
    stack: &'a Mutex<Vec<String>>,
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.stack.lock().pop();
    }
}

impl Resolve for Resolver {
    fn materialize(&self, name: &str) -> Result<(), ResolveError> {
        let _guard = self.enter(name)?;
        let _span = debug_span!("materialize", name).entered();

        match self.get_concrete(name) {
            Ok(_) => return Ok(()),
            Err(ResolveError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        match self.objects.path(name) {
            Some(path) => self.materialize_object(name, &path),
            None => self.materialize_by_convention(name, name, &[], name),
        }
    }

    fn lookup(&self, name: &str) -> Result<Instance, ResolveError> {
        self.get_concrete(name)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
