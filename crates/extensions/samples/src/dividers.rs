//! Sample dividers.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use layerflow_core::record;
use layerflow_protocols::{Component, Divider, FlowContext, Instance, Named, Resolve, ResolveError};

#[derive(Debug, Default, Deserialize)]
pub struct FixedConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub select: String,
}

/// Always selects the same handler.
#[derive(Debug, Default)]
pub struct FixedDivider {
    name: String,
    select: String,
}

impl Named for FixedDivider {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Divider for FixedDivider {
    fn select(&self, _ctx: &FlowContext) -> String {
        self.select.clone()
    }
}

impl Component for FixedDivider {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: FixedConf = record::decode(raw, "FixedDivider")?;
        self.name = conf.name;
        self.select = conf.select;
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Divider(Arc::new(*self))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContextKeyConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub routes: HashMap<String, String>,
    #[serde(default)]
    pub default: String,
}

/// Selects a handler from the context value stored under `key`.
///
/// With no `routes` the value itself is the selection. Otherwise the value is
/// mapped through `routes`, falling back to `default` for unmapped or missing
/// values.
#[derive(Debug, Default)]
pub struct ContextKeyDivider {
    name: String,
    key: String,
    routes: HashMap<String, String>,
    default: String,
}

impl ContextKeyDivider {
    fn value(&self, ctx: &FlowContext) -> Option<String> {
        match ctx.get::<Value>(&self.key)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl Named for ContextKeyDivider {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Divider for ContextKeyDivider {
    fn select(&self, ctx: &FlowContext) -> String {
        let value = self.value(ctx);
        if self.routes.is_empty() {
            return value.unwrap_or_else(|| self.default.clone());
        }
        value
            .and_then(|v| self.routes.get(&v).cloned())
            .unwrap_or_else(|| self.default.clone())
    }
}

impl Component for ContextKeyDivider {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: ContextKeyConf = record::decode(raw, "ContextKeyDivider")?;
        self.name = conf.name;
        self.key = conf.key;
        self.routes = conf.routes;
        self.default = conf.default;
        Ok(())
    }

    fn load_environment(&mut self) -> Result<(), ResolveError> {
        if self.key.is_empty() {
            return Err(ResolveError::component_config("ContextKeyDivider", "key is required"));
        }
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Divider(Arc::new(*self))
    }
}
