//! Raw input accepted by a field before normalization.

use serde_json::{Map, Value};

/// Any shape a field value may arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<M> {
    /// No value
    Null,
    /// Plain key-value mapping, not yet validated
    Mapping(Map<String, Value>),
    /// JSON text, not yet parsed
    Json(String),
    /// Already validated instance
    Instance(M),
}

impl<M> RawValue<M> {
    pub fn instance(value: M) -> Self {
        RawValue::Instance(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, RawValue::Instance(_))
    }

    /// Shape name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Mapping(_) => "mapping",
            RawValue::Json(_) => "json",
            RawValue::Instance(_) => "instance",
        }
    }
}

impl<M> Default for RawValue<M> {
    fn default() -> Self {
        RawValue::Null
    }
}

impl<M> From<Option<M>> for RawValue<M> {
    fn from(value: Option<M>) -> Self {
        value.map_or(RawValue::Null, RawValue::Instance)
    }
}

impl<M> From<Map<String, Value>> for RawValue<M> {
    fn from(map: Map<String, Value>) -> Self {
        RawValue::Mapping(map)
    }
}

impl<M> From<String> for RawValue<M> {
    fn from(text: String) -> Self {
        RawValue::Json(text)
    }
}

impl<M> From<&str> for RawValue<M> {
    fn from(text: &str) -> Self {
        RawValue::Json(text.to_string())
    }
}

/// JSON values map by shape: objects are mappings, strings are JSON text.
/// Other values are kept as their JSON text so validation reports them.
impl<M> From<Value> for RawValue<M> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Object(map) => RawValue::Mapping(map),
            Value::String(text) => RawValue::Json(text),
            other => RawValue::Json(other.to_string()),
        }
    }
}
