//! Doubles shared by the component tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use layerflow_protocols::{Divider, FlowContext, Handler, Instance, Named, Resolve, ResolveError};

/// Handler returning a fixed result and counting its calls.
pub struct Spy {
    name: String,
    result: bool,
    calls: AtomicUsize,
}

impl Spy {
    pub fn new(name: &str, result: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            result,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Named for Spy {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for Spy {
    async fn handle(&self, _ctx: &FlowContext) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

/// Divider always selecting the same name.
pub struct Route {
    name: String,
    select: String,
}

impl Route {
    pub fn new(name: &str, select: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            select: select.to_string(),
        })
    }
}

impl Named for Route {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Divider for Route {
    fn select(&self, _ctx: &FlowContext) -> String {
        self.select.clone()
    }
}

/// Resolver over a fixed set of instances.
#[derive(Default)]
pub struct MapResolver {
    instances: Mutex<HashMap<String, Instance>>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, instance: Instance) {
        self.instances.lock().insert(instance.name().to_string(), instance);
    }

    pub fn with_handler(self, handler: Arc<dyn Handler>) -> Self {
        self.insert(Instance::Handler(handler));
        self
    }

    pub fn with_divider(self, divider: Arc<dyn Divider>) -> Self {
        self.insert(Instance::Divider(divider));
        self
    }
}

impl Resolve for MapResolver {
    fn materialize(&self, name: &str) -> Result<(), ResolveError> {
        if self.instances.lock().contains_key(name) {
            Ok(())
        } else {
            Err(ResolveError::ObjectNameNotFound(name.to_string()))
        }
    }

    fn lookup(&self, name: &str) -> Result<Instance, ResolveError> {
        self.instances
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}
