//! Result values → JSON.
//!
//! Domain objects are re-expanded to their explicit form and every quantity
//! is rescaled into the caller's unit for its family, then flattened to plain
//! numbers. The unit itself travels in the enclosing object's `units` field.

use serde_json::{json, Map, Value as JsonValue};

use crate::models::{ContinuousSignal, EventTrain, Value};
use crate::units::{Quantity, UnitRegistry};

use super::SerializeError;

/// Deepest nesting of mappings and sequences a result may have.
///
/// Matches serde_json's own parse limit, so anything a client can send can
/// also be sent back.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Flatten `value` into JSON-safe primitives.
pub fn serialize(value: &Value, units: &UnitRegistry) -> Result<JsonValue, SerializeError> {
    serialize_at(value, units, 0)
}

fn serialize_at(value: &Value, units: &UnitRegistry, depth: usize) -> Result<JsonValue, SerializeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(SerializeError::TooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }
    match value {
        Value::Map(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (key, item) in entries {
                out.insert(key.clone(), serialize_at(item, units, depth + 1)?);
            }
            Ok(JsonValue::Object(out))
        }
        Value::List(items) => items
            .iter()
            .map(|item| serialize_at(item, units, depth + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Value::EventTrain(train) => serialize_event_train(train, units),
        Value::Signal(signal) => serialize_signal(signal, units),
        Value::Quantity(quantity) => serialize_quantity(quantity, units),
        Value::Json(json) => Ok(json.clone()),
    }
}

fn serialize_event_train(train: &EventTrain, units: &UnitRegistry) -> Result<JsonValue, SerializeError> {
    Ok(json!({
        "spiketrain": {
            "times": serialize_quantity(&train.times_quantity(), units)?,
            "units": units.time().symbol(),
            "t_start": serialize_quantity(&train.t_start_quantity(), units)?,
            "t_stop": serialize_quantity(&train.t_stop_quantity(), units)?,
        }
    }))
}

fn serialize_signal(signal: &ContinuousSignal, units: &UnitRegistry) -> Result<JsonValue, SerializeError> {
    Ok(json!({
        "signal": {
            "signal": serialize_quantity(&signal.samples_quantity(), units)?,
            "units": units.amplitude().symbol(),
            "sampling_rate": serialize_quantity(signal.sampling_rate(), units)?,
            "t_start": serialize_quantity(signal.t_start(), units)?,
        }
    }))
}

fn serialize_quantity(quantity: &Quantity, units: &UnitRegistry) -> Result<JsonValue, SerializeError> {
    Ok(units.canonicalize(quantity)?.magnitude().to_json())
}
