//! Layer center: an ordered AND-chain of layers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use layerflow_protocols::{Category, Component, FlowContext, Handler, Instance, Named, Resolve, ResolveError};

use super::handler_group::{resolve_handlers, run_chain};
use crate::record;

/// Layer center configuration record.
#[derive(Debug, Default, Deserialize)]
pub struct LayerCenterConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layers: Vec<String>,
}

/// Runs its layers in order and stops at the first one that fails.
#[derive(Default)]
pub struct LayerCenter {
    name: String,
    layers: Vec<Arc<dyn Handler>>,
}

impl LayerCenter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Append a layer.
    pub fn add(&mut self, layer: Arc<dyn Handler>) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Named for LayerCenter {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for LayerCenter {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        run_chain(&self.layers, ctx).await
    }
}

impl Component for LayerCenter {
    fn load_config(&mut self, raw: &[u8], resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: LayerCenterConf = record::decode(raw, Category::LayerCenter.tag())?;
        self.name = conf.name;
        self.layers.extend(resolve_handlers(&conf.layers, resolver)?);
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}
