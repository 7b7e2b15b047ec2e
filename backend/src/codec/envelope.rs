//! Wire-level request shapes.
//!
//! The JSON boundary decides once whether a domain object arrived in compact
//! form (a bare array leaning on request defaults) or explicit form (a mapping
//! of constructor fields). Everything past this module pattern-matches on
//! [`WireForm`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::units::UnitOverrides;

use super::DeserializeError;

/// The full inbound payload of a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Parameter name → raw JSON value.
    #[serde(default)]
    pub data: Map<String, JsonValue>,
    #[serde(default)]
    pub units: UnitOverrides,
    /// Default start of compact trains and signals, in the time unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_start: Option<f64>,
    /// Default stop of compact trains, in the time unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_stop: Option<f64>,
    /// Default rate of compact signals, in the rate unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<f64>,
}

impl RequestEnvelope {
    /// Parse an envelope; `null` is read as an empty request.
    pub fn from_json(value: JsonValue) -> Result<Self, DeserializeError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| DeserializeError::Malformed {
            field: "<envelope>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Explicit constructor fields of an event train.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventTrainFields {
    pub times: Vec<f64>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub t_start: Option<f64>,
    #[serde(default)]
    pub t_stop: Option<f64>,
    /// Descriptive metadata. Accepted so annotated objects can be sent
    /// as they are, otherwise ignored.
    #[serde(default)]
    pub name: Option<JsonValue>,
    #[serde(default)]
    pub description: Option<JsonValue>,
    #[serde(default)]
    pub file_origin: Option<JsonValue>,
    #[serde(default)]
    pub annotations: Option<JsonValue>,
    #[serde(default)]
    pub array_annotations: Option<JsonValue>,
}

/// Explicit constructor fields of a continuous signal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalFields {
    #[serde(deserialize_with = "deserialize_samples")]
    pub signal: Vec<f64>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub sampling_rate: Option<f64>,
    #[serde(default)]
    pub sampling_period: Option<f64>,
    #[serde(default)]
    pub t_start: Option<f64>,
    /// Ignored metadata, as for event trains.
    #[serde(default)]
    pub name: Option<JsonValue>,
    #[serde(default)]
    pub description: Option<JsonValue>,
    #[serde(default)]
    pub file_origin: Option<JsonValue>,
    #[serde(default)]
    pub annotations: Option<JsonValue>,
    #[serde(default)]
    pub array_annotations: Option<JsonValue>,
}

/// Which wire form a domain object was sent in.
#[derive(Debug, Clone, PartialEq)]
pub enum WireForm<F> {
    Compact(Vec<f64>),
    Explicit(F),
}

impl<F: DeserializeOwned> WireForm<F> {
    /// Classify `value`.
    ///
    /// Mappings wrapped in a single `wrapper` key (the shape the serializer
    /// emits) are unwrapped first so results can be sent back as arguments.
    pub fn parse(field: &str, wrapper: &str, value: &JsonValue) -> Result<Self, DeserializeError> {
        match value {
            JsonValue::Array(_) => {
                let values = samples_from_json(value).map_err(|message| DeserializeError::Malformed {
                    field: field.to_string(),
                    message,
                })?;
                Ok(WireForm::Compact(values))
            }
            JsonValue::Object(map) => {
                let inner = match map.get(wrapper) {
                    Some(inner @ JsonValue::Object(_)) if map.len() == 1 => inner,
                    _ => value,
                };
                let fields = serde_json::from_value(inner.clone()).map_err(|e| {
                    DeserializeError::Malformed {
                        field: field.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(WireForm::Explicit(fields))
            }
            other => Err(DeserializeError::Malformed {
                field: field.to_string(),
                message: format!("expected an array or an object, got {}", json_kind(other)),
            }),
        }
    }
}

/// Read a flat numeric array, or a single-column matrix (`[[a], [b]]`).
pub fn samples_from_json(value: &JsonValue) -> Result<Vec<f64>, String> {
    let JsonValue::Array(items) = value else {
        return Err(format!("expected an array, got {}", json_kind(value)));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Number(n) => n.as_f64().ok_or_else(|| format!("element {} is not a finite number", i)),
            JsonValue::Array(row) if row.len() == 1 => row[0]
                .as_f64()
                .ok_or_else(|| format!("element {} is not numeric", i)),
            other => Err(format!("element {} is not numeric: {}", i, other)),
        })
        .collect()
}

fn deserialize_samples<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    samples_from_json(&value).map_err(serde::de::Error::custom)
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
