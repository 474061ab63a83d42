//! Async handler group: concurrent fan-out over a set of handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::warn;

use layerflow_protocols::{Category, Component, FlowContext, Handler, Instance, Named, Resolve, ResolveError};

use super::handler_group::{HandlerGroupConf, resolve_handlers};
use super::timing::handle_timed;
use crate::record;

/// Runs every handler concurrently and succeeds only if all of them do.
///
/// There is no early cancellation: a failing handler does not stop its
/// siblings, and the group waits for every task before looking at results.
#[derive(Default)]
pub struct AsyncHandlerGroup {
    name: String,
    handlers: Vec<Arc<dyn Handler>>,
}

impl AsyncHandlerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

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

impl Named for AsyncHandlerGroup {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for AsyncHandlerGroup {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        if self.handlers.is_empty() {
            return true;
        }

        // One slot per handler, so no sender ever waits.
        let (tx, mut rx) = mpsc::channel(self.handlers.len());
        let mut tasks = JoinSet::new();
        for handler in &self.handlers {
            let handler = handler.clone();
            let ctx = ctx.clone();
            let tx = tx.clone();
            tasks.spawn(async move {
                let outcome = handle_timed(handler.as_ref(), &ctx).await;
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let mut all_ok = true;
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(group = %self.name, error = %e, "Handler task did not complete");
                all_ok = false;
            }
        }

        while let Ok(outcome) = rx.try_recv() {
            all_ok &= outcome;
        }
        all_ok
    }
}

impl Component for AsyncHandlerGroup {
    fn load_config(&mut self, raw: &[u8], resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: HandlerGroupConf = record::decode(raw, Category::AsyncHandlerGroup.tag())?;
        self.name = conf.name;
        self.handlers.extend(resolve_handlers(&conf.handlers, resolver)?);
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}
