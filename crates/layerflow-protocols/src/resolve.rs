//! Resolver handle used by components during construction.

use std::sync::Arc;

use crate::category::Category;
use crate::component::{Divider, Handler, Instance};
use crate::error::ResolveError;

/// Turns bare names into materialized components.
///
/// Composites receive a `&dyn Resolve` while loading their configuration and
/// use it to pull in the children they reference by name.
pub trait Resolve: Send + Sync {
    /// Construct `name` if it does not exist yet. Idempotent.
    fn materialize(&self, name: &str) -> Result<(), ResolveError>;

    /// Find an already-registered (or category-indexed) component by name.
    fn lookup(&self, name: &str) -> Result<Instance, ResolveError>;

    /// Materialize then look up.
    fn resolve(&self, name: &str) -> Result<Instance, ResolveError> {
        self.materialize(name)?;
        self.lookup(name)
    }

    /// Resolve a component that must be able to handle.
    fn resolve_handler(&self, name: &str) -> Result<Arc<dyn Handler>, ResolveError> {
        self.resolve(name)?
            .as_handler()
            .ok_or_else(|| ResolveError::CapabilityMismatch {
                name: name.to_string(),
                expected: Category::Handler,
            })
    }

    /// Resolve a component that must be able to route.
    fn resolve_divider(&self, name: &str) -> Result<Arc<dyn Divider>, ResolveError> {
        self.resolve(name)?
            .as_divider()
            .ok_or_else(|| ResolveError::CapabilityMismatch {
                name: name.to_string(),
                expected: Category::Divider,
            })
    }
}
