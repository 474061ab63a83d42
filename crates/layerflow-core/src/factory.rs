//! Type registry: constructs components by declared type name.
//!
//! A prototype is a closure producing a blank [`Component`]. Instantiation
//! runs the component's hooks in a fixed order and then claims its name in a
//! category-agnostic instance cache, so no two components anywhere in the
//! graph can share a name.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use layerflow_protocols::{Category, Component, IdentityConflict, Instance, Resolve, ResolveError};

/// Constructor of blank components.
pub type Prototype = Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// Registry of constructible types plus the global name→instance cache.
#[derive(Default)]
pub struct TypeRegistry {
    prototypes: DashMap<String, Prototype>,
    instances: DashMap<String, Instance>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prototype under `type_name`.
    pub fn register<F>(&self, type_name: impl Into<String>, prototype: F) -> Result<(), ResolveError>
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        self.register_prototype(type_name, Arc::new(prototype))
    }

    /// Register a `Default`-constructible component type.
    pub fn register_default<C>(&self, type_name: impl Into<String>) -> Result<(), ResolveError>
    where
        C: Component + Default + 'static,
    {
        self.register(type_name, || Box::new(C::default()) as Box<dyn Component>)
    }

    /// Register an already-shared prototype.
    pub fn register_prototype(&self, type_name: impl Into<String>, prototype: Prototype) -> Result<(), ResolveError> {
        match self.prototypes.entry(type_name.into()) {
            Entry::Occupied(entry) => {
                Err(IdentityConflict::TypeAlreadyRegistered(entry.key().clone()).into())
            }
            Entry::Vacant(slot) => {
                slot.insert(prototype);
                Ok(())
            }
        }
    }

    /// Build a component of `type_name` from `raw` configuration.
    ///
    /// The resolver handle is passed to the component's configuration hook so
    /// it can materialize its own dependencies first.
    pub fn instantiate(
        &self,
        type_name: &str,
        raw: &[u8],
        resolver: &dyn Resolve,
    ) -> Result<Instance, ResolveError> {
        let prototype = self
            .prototypes
            .get(type_name)
            .map(|p| p.clone())
            .ok_or_else(|| ResolveError::UnknownType(type_name.to_string()))?;

        let mut component = prototype();
        component.load_config(raw, resolver)?;
        component.load_environment()?;

        let name = component.name().to_string();
        if name.is_empty() {
            return Err(IdentityConflict::EmptyName(type_name.to_string()).into());
        }

        let instance = component.into_instance();
        match self.instances.entry(name) {
            Entry::Occupied(entry) => Err(IdentityConflict::NameAlreadyUsed {
                name: entry.key().clone(),
                type_name: type_name.to_string(),
            }
            .into()),
            Entry::Vacant(slot) => {
                debug!(type_name, name = %slot.key(), "Instantiated component");
                slot.insert(instance.clone());
                Ok(instance)
            }
        }
    }

    /// Claim `name` for a component built outside the registry.
    ///
    /// Fails if the name is empty or already held by any component, built or
    /// claimed.
    pub fn claim(&self, name: &str, instance: &Instance) -> Result<(), IdentityConflict> {
        if name.is_empty() {
            let kind = match instance {
                Instance::Handler(_) => Category::Handler,
                Instance::Divider(_) => Category::Divider,
            };
            return Err(IdentityConflict::EmptyName(kind.tag().to_string()));
        }

        match self.instances.entry(name.to_string()) {
            Entry::Occupied(entry) => Err(IdentityConflict::NameTaken(entry.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(instance.clone());
                Ok(())
            }
        }
    }

    /// Instance built under `name`, in any category.
    pub fn get(&self, name: &str) -> Option<Instance> {
        self.instances.get(name).map(|i| i.clone())
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.prototypes.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.prototypes.iter().map(|p| p.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of instances built so far.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Forget built instances. Prototypes stay registered.
    pub fn reset_instances(&self) {
        self.instances.clear();
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
