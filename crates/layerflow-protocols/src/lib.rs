//! # LayerFlow Protocols
//!
//! Contracts shared by every LayerFlow crate.
//!
//! ## Components
//!
//! - [`Handler`] - Leaf or composite unit of work
//! - [`Divider`] - Routing predicate used by layers
//! - [`Component`] - Constructible object produced by the type registry
//! - [`Resolve`] - Handle components use to pull in their dependencies
//! - [`FlowContext`] - Request-scoped context shared through one execution pass

pub mod category;
pub mod component;
pub mod context;
pub mod error;
pub mod resolve;

pub use category::Category;
pub use component::{Component, Divider, Handler, Instance, Named};
pub use context::{DurationRecord, FlowContext};
pub use error::{IdentityConflict, ResolveError};
pub use resolve::Resolve;
