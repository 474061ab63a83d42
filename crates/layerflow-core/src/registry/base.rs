//! Base registry implementation.
//!
//! Provides the name→instance cache shared by every category registry.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use layerflow_protocols::{Category, IdentityConflict};

/// Generic cache of live instances keyed by name.
///
/// - Thread-safe storage using DashMap
/// - Insert-once registration: a name can never be rebound
/// - Get by name
///
/// # Type Parameters
///
/// * `T` - The trait object type to store (e.g., `dyn Handler`, `dyn Divider`)
pub struct BaseRegistry<T: ?Sized> {
    category: Category,
    items: DashMap<String, Arc<T>>,
}

impl<T: ?Sized> BaseRegistry<T> {
    /// Create a new empty registry for `category`.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            items: DashMap::new(),
        }
    }

    /// Register an item under `name`.
    ///
    /// Returns an identity conflict if the name is already bound.
    pub fn register(&self, name: &str, item: Arc<T>) -> Result<(), IdentityConflict> {
        match self.items.entry(name.to_string()) {
            Entry::Occupied(_) => Err(IdentityConflict::AlreadyRegistered {
                category: self.category,
                name: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(item);
                Ok(())
            }
        }
    }

    /// Get an item by name.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.items.get(name).map(|item| item.clone())
    }

    /// Check if an item with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// List all registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.items.iter().map(|item| item.key().clone()).collect();
        names.sort();
        names
    }

    /// Get the number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every registered item.
    pub fn clear(&self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
