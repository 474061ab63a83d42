//! Execution context shared through one pass over a component graph.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

/// Time spent inside one child component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationRecord {
    pub name: String,
    pub elapsed: Duration,
}

/// Context passed to every handler and divider.
///
/// Cloning is cheap and clones share payload, data and duration records, so a
/// clone handed to a concurrent task observes the same state.
#[derive(Clone)]
pub struct FlowContext {
    /// Correlation ID for tracing.
    pub correlation_id: String,

    /// Record per-component timing while executing.
    pub show_duration: bool,

    /// Opaque caller payload.
    payload: Option<Arc<dyn Any + Send + Sync>>,

    /// Context data.
    data: Arc<RwLock<HashMap<String, serde_json::Value>>>,

    durations: Arc<Mutex<Vec<DurationRecord>>>,
}

impl FlowContext {
    /// Create a new execution context without payload.
    pub fn new() -> Self {
        Self {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            show_duration: false,
            payload: None,
            data: Arc::new(RwLock::new(HashMap::new())),
            durations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a context carrying an opaque payload.
    pub fn with_payload<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            payload: Some(Arc::new(payload)),
            ..Self::new()
        }
    }

    /// Enable or disable per-component timing.
    pub fn show_duration(mut self, enabled: bool) -> Self {
        self.show_duration = enabled;
        self
    }

    /// Borrow the payload as `T`, if present and of that type.
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    /// Get a value from context data.
    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let data = self.data.read();
        data.get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in context data.
    pub fn set<T: serde::Serialize>(&self, key: impl Into<String>, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            let mut data = self.data.write();
            data.insert(key.into(), v);
        }
    }

    /// Record how long a named component took.
    pub fn record_duration(&self, name: impl Into<String>, elapsed: Duration) {
        self.durations.lock().push(DurationRecord {
            name: name.into(),
            elapsed,
        });
    }

    /// Snapshot of the recorded durations, in completion order.
    pub fn durations(&self) -> Vec<DurationRecord> {
        self.durations.lock().clone()
    }
}

impl Default for FlowContext {
    fn default() -> Self {
        Self::new()
    }
}
