//! Analytics data layer.
//!
//! Events are plain JSON objects appended to a buffer that a reporting sink
//! drains later. Delivery is the sink's concern.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataLayer {
    entries: Vec<Value>,
}

impl DataLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Value) {
        self.entries.push(entry);
    }

    /// Push `{"event": name, ...fields}`.
    ///
    /// Non-object `fields` are stored under `"data"`.
    pub fn push_event(&mut self, name: &str, fields: Value) {
        let mut entry = Map::new();
        entry.insert("event".to_string(), Value::String(name.to_string()));
        match fields {
            Value::Object(fields) => entry.extend(fields),
            Value::Null => {}
            other => {
                entry.insert("data".to_string(), other);
            }
        }
        self.push(Value::Object(entry));
    }

    #[must_use]
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every buffered entry, leaving the layer empty.
    pub fn drain(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.entries)
    }
}

/// Pushes its payload once each time its trigger turns truthy.
///
/// The trigger re-arms when it turns falsy again.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredPush {
    payload: Value,
    fired: bool,
}

impl TriggeredPush {
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self {
            payload,
            fired: false,
        }
    }

    /// Report the trigger's current state; returns `true` when it pushed.
    pub fn update(&mut self, trigger: bool, layer: &mut DataLayer) -> bool {
        if !trigger {
            self.fired = false;
            return false;
        }
        if self.fired {
            return false;
        }
        self.fired = true;
        layer.push(self.payload.clone());
        true
    }
}
