//! Generic leaf components for LayerFlow.
//!
//! This extension provides:
//! - `StaticHandler`: returns a configured result, optionally logging a message
//! - `SetValueHandler`: writes a value into the flow context
//! - `ExpectValueHandler`: compares a context value against an expected one
//! - `SleepHandler`: waits, then returns a configured result
//! - `NoopHandler`: always succeeds; built by name without configuration
//! - `FixedDivider`: always selects the same handler
//! - `ContextKeyDivider`: selects a handler from a context value

mod dividers;
mod handlers;
mod register;

pub use dividers::{ContextKeyDivider, FixedDivider};
pub use handlers::{ExpectValueHandler, NoopHandler, SetValueHandler, SleepHandler, StaticHandler};
pub use register::register_samples;
