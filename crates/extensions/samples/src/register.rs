//! Type registration for the sample components.

use layerflow_core::TypeRegistry;
use layerflow_protocols::ResolveError;

use crate::dividers::{ContextKeyDivider, FixedDivider};
use crate::handlers::{ExpectValueHandler, NoopHandler, SetValueHandler, SleepHandler, StaticHandler};

/// Register every sample type under its Rust name.
pub fn register_samples(types: &TypeRegistry) -> Result<(), ResolveError> {
    types.register_default::<StaticHandler>("StaticHandler")?;
    types.register_default::<SetValueHandler>("SetValueHandler")?;
    types.register_default::<ExpectValueHandler>("ExpectValueHandler")?;
    types.register_default::<SleepHandler>("SleepHandler")?;
    types.register_default::<NoopHandler>("NoopHandler")?;
    types.register_default::<FixedDivider>("FixedDivider")?;
    types.register_default::<ContextKeyDivider>("ContextKeyDivider")?;
    Ok(())
}
