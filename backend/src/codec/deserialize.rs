//! Request data → keyword arguments.

use log::debug;
use serde_json::{Map, Value as JsonValue};

use crate::models::{ContinuousSignal, EventTrain, Kwargs, Value};
use crate::units::{Magnitude, Quantity, Unit, UnitRegistry};

use super::envelope::{json_kind, EventTrainFields, RequestEnvelope, SignalFields, WireForm};
use super::DeserializeError;

/// Parameter names whose raw numbers are read in the registry's time unit.
pub const TIME_PARAMETERS: &[&str] = &["bin_size", "binsize", "t_start", "t_stop", "times"];

/// Builds domain objects from request fields.
///
/// Request-level defaults only fill fields an explicit object leaves out;
/// they never replace a field the caller wrote.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    units: &'a UnitRegistry,
    t_start: Quantity,
    t_stop: Option<Quantity>,
    sampling_rate: Option<Quantity>,
}

impl<'a> Deserializer<'a> {
    /// A deserializer with no defaults beyond `t_start = 0`.
    pub fn new(units: &'a UnitRegistry) -> Self {
        Self::with_defaults(units, None, None, None)
    }

    /// Defaults are raw numbers in the registry's time and rate units.
    pub fn with_defaults(
        units: &'a UnitRegistry,
        t_start: Option<f64>,
        t_stop: Option<f64>,
        sampling_rate: Option<f64>,
    ) -> Self {
        Self {
            units,
            t_start: Quantity::new(t_start.unwrap_or(0.0), units.time().clone()),
            t_stop: t_stop.map(|v| Quantity::new(v, units.time().clone())),
            sampling_rate: sampling_rate.map(|v| Quantity::new(v, units.rate().clone())),
        }
    }

    pub fn from_envelope(units: &'a UnitRegistry, envelope: &RequestEnvelope) -> Self {
        Self::with_defaults(units, envelope.t_start, envelope.t_stop, envelope.sampling_rate)
    }

    /// Convert every entry of a request's `data` mapping.
    pub fn deserialize_data(&self, data: &Map<String, JsonValue>) -> Result<Kwargs, DeserializeError> {
        let mut kwargs = Kwargs::new();
        for (key, value) in data {
            let converted = match key.as_str() {
                "signal" => Value::Signal(self.to_continuous_signal(key, value)?),
                "signals" => Value::List(
                    self.to_continuous_signals(key, value)?
                        .into_iter()
                        .map(Value::Signal)
                        .collect(),
                ),
                "spiketrain" => Value::EventTrain(self.to_event_train(key, value)?),
                "spiketrains" => Value::List(
                    self.to_event_trains(key, value)?
                        .into_iter()
                        .map(Value::EventTrain)
                        .collect(),
                ),
                name if TIME_PARAMETERS.contains(&name) => Value::Quantity(self.to_time_quantity(key, value)?),
                _ => Value::Json(value.clone()),
            };
            debug!("deserialized '{}' as {}", key, converted.kind());
            kwargs.insert(key.clone(), converted);
        }
        Ok(kwargs)
    }

    pub fn to_event_train(&self, field: &str, value: &JsonValue) -> Result<EventTrain, DeserializeError> {
        match WireForm::<EventTrainFields>::parse(field, "spiketrain", value)? {
            WireForm::Compact(times) => self.build_event_train(
                field,
                times,
                self.units.time().clone(),
                self.t_start.clone(),
                self.t_stop.clone(),
            ),
            WireForm::Explicit(fields) => {
                let unit = match fields.units.as_deref() {
                    Some(symbol) => Unit::parse(symbol).map_err(|e| DeserializeError::unit(field, e))?,
                    None => self.units.time().clone(),
                };
                let t_start = fields
                    .t_start
                    .map(|v| Quantity::new(v, unit.clone()))
                    .unwrap_or_else(|| self.t_start.clone());
                let t_stop = fields
                    .t_stop
                    .map(|v| Quantity::new(v, unit.clone()))
                    .or_else(|| self.t_stop.clone());
                self.build_event_train(field, fields.times, unit, t_start, t_stop)
            }
        }
    }

    pub fn to_event_trains(&self, field: &str, value: &JsonValue) -> Result<Vec<EventTrain>, DeserializeError> {
        elements(field, value)?
            .iter()
            .enumerate()
            .map(|(i, item)| self.to_event_train(&format!("{}[{}]", field, i), item))
            .collect()
    }

    pub fn to_continuous_signal(
        &self,
        field: &str,
        value: &JsonValue,
    ) -> Result<ContinuousSignal, DeserializeError> {
        let (samples, unit, sampling_rate, t_start) =
            match WireForm::<SignalFields>::parse(field, "signal", value)? {
                WireForm::Compact(samples) => (
                    samples,
                    self.units.amplitude().clone(),
                    self.default_sampling_rate(field)?,
                    self.t_start.clone(),
                ),
                WireForm::Explicit(fields) => {
                    let unit = match fields.units.as_deref() {
                        Some(symbol) => Unit::parse(symbol).map_err(|e| DeserializeError::unit(field, e))?,
                        None => self.units.amplitude().clone(),
                    };
                    let sampling_rate = match (fields.sampling_rate, fields.sampling_period) {
                        (Some(_), Some(_)) => {
                            return Err(DeserializeError::malformed(
                                field,
                                "give either sampling_rate or sampling_period, not both",
                            ))
                        }
                        (Some(rate), None) => Quantity::new(rate, self.units.rate().clone()),
                        (None, Some(period)) => {
                            let rate_unit = self.units.time().reciprocal().map_err(|e| DeserializeError::unit(field, e))?;
                            Quantity::new(1.0 / period, rate_unit)
                        }
                        (None, None) => self.default_sampling_rate(field)?,
                    };
                    let t_start = fields
                        .t_start
                        .map(|v| Quantity::new(v, self.units.time().clone()))
                        .unwrap_or_else(|| self.t_start.clone());
                    (fields.signal, unit, sampling_rate, t_start)
                }
            };
        ContinuousSignal::new(samples, unit, sampling_rate, t_start).map_err(|e| DeserializeError::model(field, e))
    }

    pub fn to_continuous_signals(
        &self,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<ContinuousSignal>, DeserializeError> {
        elements(field, value)?
            .iter()
            .enumerate()
            .map(|(i, item)| self.to_continuous_signal(&format!("{}[{}]", field, i), item))
            .collect()
    }

    /// A raw number or numeric array in the registry's time unit.
    pub fn to_time_quantity(&self, field: &str, value: &JsonValue) -> Result<Quantity, DeserializeError> {
        let magnitude = Magnitude::from_json(value).ok_or_else(|| {
            DeserializeError::malformed(
                field,
                format!("expected a number or an array of numbers, got {}", json_kind(value)),
            )
        })?;
        Ok(Quantity::new(magnitude, self.units.time().clone()))
    }

    fn default_sampling_rate(&self, field: &str) -> Result<Quantity, DeserializeError> {
        self.sampling_rate
            .clone()
            .ok_or_else(|| DeserializeError::malformed(field, "sampling_rate must be provided"))
    }

    /// Without any stop bound the train ends at its last event (or at `t_start` when empty).
    fn build_event_train(
        &self,
        field: &str,
        times: Vec<f64>,
        unit: Unit,
        t_start: Quantity,
        t_stop: Option<Quantity>,
    ) -> Result<EventTrain, DeserializeError> {
        let t_stop = match t_stop {
            Some(t_stop) => t_stop,
            None => match times.iter().copied().reduce(f64::max) {
                Some(last) => Quantity::new(last, unit.clone()),
                None => t_start.clone(),
            },
        };
        EventTrain::new(times, unit, &t_start, &t_stop).map_err(|e| DeserializeError::model(field, e))
    }
}

fn elements<'v>(field: &str, value: &'v JsonValue) -> Result<&'v Vec<JsonValue>, DeserializeError> {
    match value {
        JsonValue::Array(items) => Ok(items),
        other => Err(DeserializeError::malformed(
            field,
            format!("expected an array, got {}", json_kind(other)),
        )),
    }
}

/// Convert an envelope's `data` with its top-level defaults.
pub fn deserialize(envelope: &RequestEnvelope, units: &UnitRegistry) -> Result<Kwargs, DeserializeError> {
    Deserializer::from_envelope(units, envelope).deserialize_data(&envelope.data)
}
