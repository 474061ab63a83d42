//! Sample handlers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use layerflow_core::record;
use layerflow_protocols::{Component, FlowContext, Handler, Instance, Named, Resolve, ResolveError};

fn default_true() -> bool {
    true
}

/// `StaticHandler` configuration.
#[derive(Debug, Default, Deserialize)]
pub struct StaticConf {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub result: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Returns a fixed result.
#[derive(Debug, Default)]
pub struct StaticHandler {
    name: String,
    result: bool,
    message: Option<String>,
}

impl Named for StaticHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for StaticHandler {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        if let Some(message) = &self.message {
            info!(handler = %self.name, correlation_id = %ctx.correlation_id, "{}", message);
        }
        self.result
    }
}

impl Component for StaticHandler {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: StaticConf = record::decode(raw, "StaticHandler")?;
        self.name = conf.name;
        self.result = conf.result;
        self.message = conf.message;
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

/// `SetValueHandler` configuration.
#[derive(Debug, Default, Deserialize)]
pub struct SetValueConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// Writes `value` under `key` in the flow context. Always succeeds.
#[derive(Debug, Default)]
pub struct SetValueHandler {
    name: String,
    key: String,
    value: Value,
}

impl Named for SetValueHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for SetValueHandler {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        ctx.set(self.key.clone(), &self.value);
        true
    }
}

impl Component for SetValueHandler {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: SetValueConf = record::decode(raw, "SetValueHandler")?;
        self.name = conf.name;
        self.key = conf.key;
        self.value = conf.value;
        Ok(())
    }

    fn load_environment(&mut self) -> Result<(), ResolveError> {
        if self.key.is_empty() {
            return Err(ResolveError::component_config("SetValueHandler", "key is required"));
        }
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

/// `ExpectValueHandler` configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ExpectValueConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub equals: Value,
}

/// Succeeds when the context holds `equals` under `key`.
#[derive(Debug, Default)]
pub struct ExpectValueHandler {
    name: String,
    key: String,
    equals: Value,
}

impl Named for ExpectValueHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for ExpectValueHandler {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        let actual: Option<Value> = ctx.get(&self.key);
        let matched = actual.as_ref() == Some(&self.equals);
        if !matched {
            debug!(handler = %self.name, key = %self.key, ?actual, expected = %self.equals, "Value mismatch");
        }
        matched
    }
}

impl Component for ExpectValueHandler {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: ExpectValueConf = record::decode(raw, "ExpectValueHandler")?;
        self.name = conf.name;
        self.key = conf.key;
        self.equals = conf.equals;
        Ok(())
    }

    fn load_environment(&mut self) -> Result<(), ResolveError> {
        if self.key.is_empty() {
            return Err(ResolveError::component_config("ExpectValueHandler", "key is required"));
        }
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

/// `SleepHandler` configuration.
#[derive(Debug, Default, Deserialize)]
pub struct SleepConf {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub millis: u64,
    #[serde(default = "default_true")]
    pub result: bool,
}

/// Sleeps for `millis`, then returns `result`.
#[derive(Debug, Default)]
pub struct SleepHandler {
    name: String,
    delay: Duration,
    result: bool,
}

impl Named for SleepHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for SleepHandler {
    async fn handle(&self, _ctx: &FlowContext) -> bool {
        tokio::time::sleep(self.delay).await;
        self.result
    }
}

impl Component for SleepHandler {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: SleepConf = record::decode(raw, "SleepHandler")?;
        self.name = conf.name;
        self.delay = Duration::from_millis(conf.millis);
        self.result = conf.result;
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

/// Always succeeds. Its name is its type name, so it resolves by naming
/// convention with no configuration file.
#[derive(Debug, Default)]
pub struct NoopHandler;

impl Named for NoopHandler {
    fn name(&self) -> &str {
        "NoopHandler"
    }
}

#[async_trait]
impl Handler for NoopHandler {
    async fn handle(&self, _ctx: &FlowContext) -> bool {
        true
    }
}

impl Component for NoopHandler {
    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
