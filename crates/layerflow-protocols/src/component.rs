//! Component contracts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::FlowContext;
use crate::error::ResolveError;
use crate::resolve::Resolve;

/// Anything addressable by a globally-unique name.
pub trait Named {
    /// The component's name. This is its only identity.
    fn name(&self) -> &str;
}

/// Unit of work executed against a [`FlowContext`].
///
/// Leaves and every composite (layers, groups, layer centers) share this
/// contract.
#[async_trait]
pub trait Handler: Named + Send + Sync {
    /// Run the handler. `false` stops sequential chains.
    async fn handle(&self, ctx: &FlowContext) -> bool;
}

/// Routing predicate: picks the name of the handler a layer should run.
///
/// An empty or unknown name is a routing miss, not an error.
pub trait Divider: Named + Send + Sync {
    fn select(&self, ctx: &FlowContext) -> String;
}

/// A constructed component, erased to its execution capability.
#[derive(Clone)]
pub enum Instance {
    Handler(Arc<dyn Handler>),
    Divider(Arc<dyn Divider>),
}

impl Instance {
    /// Wrap a handler.
    pub fn handler(handler: impl Handler + 'static) -> Self {
        Instance::Handler(Arc::new(handler))
    }

    /// Wrap a divider.
    pub fn divider(divider: impl Divider + 'static) -> Self {
        Instance::Divider(Arc::new(divider))
    }

    pub fn name(&self) -> &str {
        match self {
            Instance::Handler(h) => h.name(),
            Instance::Divider(d) => d.name(),
        }
    }

    pub fn as_handler(&self) -> Option<Arc<dyn Handler>> {
        match self {
            Instance::Handler(h) => Some(h.clone()),
            Instance::Divider(_) => None,
        }
    }

    pub fn as_divider(&self) -> Option<Arc<dyn Divider>> {
        match self {
            Instance::Divider(d) => Some(d.clone()),
            Instance::Handler(_) => None,
        }
    }

    /// Whether both values point at the same live component.
    pub fn same(&self, other: &Instance) -> bool {
        match (self, other) {
            (Instance::Handler(a), Instance::Handler(b)) => Arc::ptr_eq(a, b),
            (Instance::Divider(a), Instance::Divider(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instance::Handler(h) => f.debug_tuple("Handler").field(&h.name()).finish(),
            Instance::Divider(d) => f.debug_tuple("Divider").field(&d.name()).finish(),
        }
    }
}

/// A blank object produced by a registered prototype.
///
/// The type registry drives the lifecycle: [`Component::load_config`] with the
/// raw configuration bytes, then [`Component::load_environment`], then reads
/// [`Named::name`], and finally converts it with [`Component::into_instance`].
pub trait Component: Named + Send {
    /// Apply raw configuration bytes.
    ///
    /// `resolver` is the handle composites use to materialize the components
    /// they reference by name. Empty input means "no configuration".
    fn load_config(&mut self, raw: &[u8], resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let _ = (raw, resolver);
        Ok(())
    }

    /// Reset or load environment-dependent state after configuration.
    fn load_environment(&mut self) -> Result<(), ResolveError> {
        Ok(())
    }

    /// Hand the finished component over as a shareable instance.
    fn into_instance(self: Box<Self>) -> Instance;
}
