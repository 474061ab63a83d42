//! Handler group: an ordered AND-chain of handlers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use layerflow_protocols::{Category, Component, FlowContext, Handler, Instance, Named, Resolve, ResolveError};

use super::timing::handle_timed;
use crate::record;

/// Handler group configuration record. Also used by async handler groups.
#[derive(Debug, Default, Deserialize)]
pub struct HandlerGroupConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub handlers: Vec<String>,
}

/// Run `handlers` in order, stopping at the first failure.
pub(crate) async fn run_chain(handlers: &[Arc<dyn Handler>], ctx: &FlowContext) -> bool {
    for handler in handlers {
        if !handle_timed(handler.as_ref(), ctx).await {
            return false;
        }
    }
    true
}

/// Resolve every name in `names` as a handler, in order.
pub(crate) fn resolve_handlers(names: &[String], resolver: &dyn Resolve) -> Result<Vec<Arc<dyn Handler>>, ResolveError> {
    names.iter().map(|name| resolver.resolve_handler(name)).collect()
}

/// Sequential handler chain.
#[derive(Default)]
pub struct HandlerGroup {
    name: String,
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Append a handler to the chain.
    pub fn add(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Named for HandlerGroup {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for HandlerGroup {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        run_chain(&self.handlers, ctx).await
    }
}

impl Component for HandlerGroup {
    fn load_config(&mut self, raw: &[u8], resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: HandlerGroupConf = record::decode(raw, Category::HandlerGroup.tag())?;
        self.name = conf.name;
        self.handlers.extend(resolve_handlers(&conf.handlers, resolver)?);
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}
