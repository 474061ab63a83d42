//! Resolver construction.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use layerflow_protocols::{Category, Component, ResolveError};

use crate::components::{AsyncHandlerGroup, HandlerGroup, Layer, LayerCenter};
use crate::factory::{Prototype, TypeRegistry};
use crate::resolver::Resolver;

/// Registers a family of types at once.
pub type Registrar = fn(&TypeRegistry) -> Result<(), ResolveError>;

/// Register the four composite types under their category tags.
pub fn register_builtin_types(types: &TypeRegistry) -> Result<(), ResolveError> {
    types.register_default::<Layer>(Category::Layer.tag())?;
    types.register_default::<LayerCenter>(Category::LayerCenter.tag())?;
    types.register_default::<HandlerGroup>(Category::HandlerGroup.tag())?;
    types.register_default::<AsyncHandlerGroup>(Category::AsyncHandlerGroup.tag())?;
    Ok(())
}

/// Builder for [`Resolver`].
///
/// Type registrations and folder scans are deferred to [`ResolverBuilder::build`],
/// which reports the first failure.
pub struct ResolverBuilder {
    prototypes: Vec<(String, Prototype)>,
    registrars: Vec<Registrar>,
    conf_dir: Option<PathBuf>,
    folders: Vec<(Category, PathBuf)>,
    eager: bool,
}

impl ResolverBuilder {
    /// Create a builder. Built-in composite types are always registered.
    pub fn new() -> Self {
        Self {
            prototypes: Vec::new(),
            registrars: Vec::new(),
            conf_dir: None,
            folders: Vec::new(),
            eager: false,
        }
    }

    /// Register a `Default`-constructible type.
    pub fn register_type<C>(mut self, type_name: impl Into<String>) -> Self
    where
        C: Component + Default + 'static,
    {
        let prototype: Prototype = Arc::new(|| Box::new(C::default()) as Box<dyn Component>);
        self.prototypes.push((type_name.into(), prototype));
        self
    }

    /// Register a type with a custom prototype.
    pub fn register_prototype(mut self, type_name: impl Into<String>, prototype: Prototype) -> Self {
        self.prototypes.push((type_name.into(), prototype));
        self
    }

    /// Run a registrar against the type registry.
    pub fn registrar(mut self, registrar: Registrar) -> Self {
        self.registrars.push(registrar);
        self
    }

    /// Global object folder, scanned recursively.
    pub fn conf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.conf_dir = Some(dir.into());
        self
    }

    /// Flat folder holding one category's configuration files.
    pub fn category_folder(mut self, category: Category, folder: impl Into<PathBuf>) -> Self {
        self.folders.push((category, folder.into()));
        self
    }

    /// Construct every category-folder component during build instead of on
    /// first use.
    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    pub fn build(self) -> Result<Resolver, ResolveError> {
        let types = TypeRegistry::new();
        register_builtin_types(&types)?;
        for registrar in &self.registrars {
            registrar(&types)?;
        }
        for (type_name, prototype) in self.prototypes {
            types.register_prototype(type_name, prototype)?;
        }

        let resolver = Resolver::new(types);
        if let Some(dir) = &self.conf_dir {
            let names = resolver.index_conf_folder(dir)?;
            debug!(dir = %dir.display(), count = names.len(), "Indexed object folder");
        }

        // Index every folder before constructing anything, so components can
        // reference names from any category folder.
        for (category, folder) in &self.folders {
            resolver.index_folder(*category, folder)?;
        }
        if self.eager {
            for (category, _) in &self.folders {
                for name in resolver.indexed_names(*category) {
                    resolver.get(*category, &name)?;
                }
            }
        }

        Ok(resolver)
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
