//! The event record passed through a hook's handler chain.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use fixi_core::error::AppError;

/// Event payload handed from handler to handler during a dispatch.
///
/// A flat record of string keys to JSON values. The default value is the
/// empty record, which is what a dispatch without an explicit event starts
/// from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookEvent {
    data: Map<String, Value>,
}

impl HookEvent {
    /// Creates an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value and returns the event.
    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with_data(key, Value::from(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_data(key, Value::from(value))
    }

    /// Inserts a boolean value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_data(key, Value::from(value))
    }

    /// Inserts a value in place, returning the previous one.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.data.insert(key.to_string(), value)
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Gets a value by key.
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Gets a string value.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(|v| v.as_bool())
    }

    /// Gets an array value.
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.data.get(key).and_then(|v| v.as_array())
    }

    /// Number of keys in the record.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Converts the event into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }
}

impl From<Map<String, Value>> for HookEvent {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

impl TryFrom<Value> for HookEvent {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(AppError::validation(format!(
                "hook events must be JSON objects, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders_and_getters() {
        let event = HookEvent::new()
            .with_string("name", "fixi")
            .with_int("count", 3)
            .with_bool("ready", true)
            .with_data("seen", json!(["a"]));

        assert_eq!(event.get_string("name"), Some("fixi"));
        assert_eq!(event.get_i64("count"), Some(3));
        assert_eq!(event.get_bool("ready"), Some(true));
        assert_eq!(event.get_array("seen").map(|a| a.len()), Some(1));
        assert_eq!(event.len(), 4);
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(HookEvent::try_from(json!({"v": 1})).is_ok());

        let err = HookEvent::try_from(json!([1, 2])).unwrap_err();
        assert_eq!(err.kind, fixi_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let event = HookEvent::new().with_int("v", 1);
        assert_eq!(serde_json::to_value(&event).unwrap(), json!({"v": 1}));
        assert_eq!(event.into_value(), json!({"v": 1}));
    }
}
