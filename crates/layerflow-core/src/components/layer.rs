//! Layer: a divider picks one handler out of a named set.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use layerflow_protocols::{
    Category, Component, Divider, FlowContext, Handler, Instance, Named, Resolve, ResolveError,
};

use crate::record;

/// Layer configuration record.
#[derive(Debug, Default, Deserialize)]
pub struct LayerConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub divider: String,
    #[serde(default)]
    pub handlers: Vec<String>,
}

/// Routes each call to exactly one handler.
///
/// Handlers are keyed by the name they were added under, which is what the
/// divider must return. A selection outside that set is a routing miss and
/// the layer fails.
#[derive(Default)]
pub struct Layer {
    name: String,
    divider: Option<Arc<dyn Divider>>,
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl Layer {
    /// Create an empty layer for assembly in code.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the divider. A layer has exactly one.
    pub fn set_divider(&mut self, divider: Arc<dyn Divider>) -> Result<(), ResolveError> {
        if let Some(existing) = &self.divider {
            return Err(ResolveError::DuplicateMember {
                owner: self.name.clone(),
                member: existing.name().to_string(),
            });
        }
        self.divider = Some(divider);
        Ok(())
    }

    /// Add a handler reachable under `key`.
    pub fn add_handler(&mut self, key: impl Into<String>, handler: Arc<dyn Handler>) -> Result<(), ResolveError> {
        match self.handlers.entry(key.into()) {
            Entry::Occupied(entry) => Err(ResolveError::DuplicateMember {
                owner: self.name.clone(),
                member: entry.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(handler);
                Ok(())
            }
        }
    }

    pub fn contains_handler(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Named for Layer {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for Layer {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        let Some(divider) = &self.divider else {
            debug!(layer = %self.name, "Layer has no divider");
            return false;
        };

        let selected = divider.select(ctx);
        match self.handlers.get(&selected) {
            Some(handler) => handler.handle(ctx).await,
            None => {
                debug!(layer = %self.name, divider = divider.name(), selected = %selected, "Routing miss");
                false
            }
        }
    }
}

impl Component for Layer {
    fn load_config(&mut self, raw: &[u8], resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: LayerConf = record::decode(raw, Category::Layer.tag())?;
        self.name = conf.name;

        if conf.divider.is_empty() {
            return Err(ResolveError::component_config(Category::Layer.tag(), "divider is required"));
        }
        let divider = resolver.resolve_divider(&conf.divider)?;
        self.set_divider(divider)?;
        for key in conf.handlers {
            let handler = resolver.resolve_handler(&key)?;
            self.add_handler(key, handler)?;
        }
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

#[cfg(test)]
#[path = "layer_tests.rs"]
mod tests;
