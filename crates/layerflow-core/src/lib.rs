//! # LayerFlow Core
//!
//! Resolution core for configuration-driven component graphs.
//!
//! ## Components
//!
//! - [`TypeRegistry`] - Builds components by declared type name
//! - [`NamedRegistry`] - Per-category name caches and configuration indexes
//! - [`Resolver`] - Turns bare names into live components, recursively
//! - Composites: [`Layer`], [`LayerCenter`], [`HandlerGroup`], [`AsyncHandlerGroup`]
//!
//! Configuration files are YAML records with a `type` field; a file's stem is
//! the name of the component it describes.

pub mod builder;
pub mod components;
pub mod convention;
pub mod factory;
pub mod index;
pub mod record;
pub mod registry;
pub mod resolver;

pub use builder::{Registrar, ResolverBuilder, register_builtin_types};
pub use components::{AsyncHandlerGroup, HandlerGroup, Layer, LayerCenter, handle_timed};
pub use factory::{Prototype, TypeRegistry};
pub use index::ConfigIndex;
pub use registry::{
    AsyncHandlerGroupRegistry, DividerRegistry, HandlerGroupRegistry, HandlerRegistry,
    LayerCenterRegistry, LayerRegistry, NamedRegistry,
};
pub use resolver::{LOOKUP_ORDER, Resolver};
