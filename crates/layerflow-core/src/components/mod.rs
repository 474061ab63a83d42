//! Composite components.
//!
//! Every composite is itself a [`Handler`](layerflow_protocols::Handler), so
//! composites nest freely.

mod async_handler_group;
mod handler_group;
mod layer;
mod layer_center;
mod timing;

#[cfg(test)]
pub(crate) mod test_support;

pub use async_handler_group::AsyncHandlerGroup;
pub use handler_group::{HandlerGroup, HandlerGroupConf};
pub use layer::{Layer, LayerConf};
pub use layer_center::{LayerCenter, LayerCenterConf};
pub use timing::handle_timed;
