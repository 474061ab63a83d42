//! Category registries.

mod base;
mod named;

pub use base::BaseRegistry;
pub use named::{
    AsyncHandlerGroupRegistry, Capability, DividerRegistry, HandlerGroupRegistry, HandlerRegistry,
    LayerCenterRegistry, LayerRegistry, NamedRegistry,
};
