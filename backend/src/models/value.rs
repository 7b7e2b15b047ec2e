//! The in-process value tree exchanged with analysis functions.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::units::Quantity;

use super::{ContinuousSignal, EventTrain};

/// Keyword arguments handed to a callable.
pub type Kwargs = BTreeMap<String, Value>;

/// Arguments and results of analysis functions.
///
/// Domain objects sit next to plain JSON, which is passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Json(JsonValue),
    Quantity(Quantity),
    EventTrain(EventTrain),
    Signal(ContinuousSignal),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Json(_) => "json",
            Value::Quantity(_) => "quantity",
            Value::EventTrain(_) => "spiketrain",
            Value::Signal(_) => "signal",
            Value::List(_) => "list",
            Value::Map(_) => "mapping",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Json(json) => json.as_f64(),
            _ => None,
        }
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::Json(json)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Json(JsonValue::from(v))
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Quantity(q)
    }
}

impl From<EventTrain> for Value {
    fn from(train: EventTrain) -> Self {
        Value::EventTrain(train)
    }
}

impl From<ContinuousSignal> for Value {
    fn from(signal: ContinuousSignal) -> Self {
        Value::Signal(signal)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
