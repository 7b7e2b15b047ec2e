//! Unit-tagged numeric values.

use serde_json::Value as JsonValue;

use super::unit::Unit;
use super::UnitError;

/// The numeric payload of a [`Quantity`]: a scalar or a flat array.
#[derive(Debug, Clone, PartialEq)]
pub enum Magnitude {
    Scalar(f64),
    Array(Vec<f64>),
}

impl Magnitude {
    /// Apply `f` elementwise.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Magnitude {
        match self {
            Magnitude::Scalar(v) => Magnitude::Scalar(f(*v)),
            Magnitude::Array(values) => Magnitude::Array(values.iter().map(|v| f(*v)).collect()),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Magnitude::Scalar(v) => Some(*v),
            Magnitude::Array(_) => None,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Magnitude::Scalar(v) => std::slice::from_ref(v),
            Magnitude::Array(values) => values,
        }
    }

    /// Read a JSON number or an array of numbers.
    pub fn from_json(value: &JsonValue) -> Option<Magnitude> {
        match value {
            JsonValue::Number(n) => n.as_f64().map(Magnitude::Scalar),
            JsonValue::Array(items) => items
                .iter()
                .map(JsonValue::as_f64)
                .collect::<Option<Vec<f64>>>()
                .map(Magnitude::Array),
            _ => None,
        }
    }

    /// Plain JSON number or array of numbers. Non-finite values become `null`.
    pub fn to_json(&self) -> JsonValue {
        fn number(v: f64) -> JsonValue {
            serde_json::Number::from_f64(v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null)
        }
        match self {
            Magnitude::Scalar(v) => number(*v),
            Magnitude::Array(values) => JsonValue::Array(values.iter().map(|v| number(*v)).collect()),
        }
    }
}

impl From<f64> for Magnitude {
    fn from(v: f64) -> Self {
        Magnitude::Scalar(v)
    }
}

impl From<Vec<f64>> for Magnitude {
    fn from(values: Vec<f64>) -> Self {
        Magnitude::Array(values)
    }
}

/// A numeric scalar or array tagged with a unit of measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    magnitude: Magnitude,
    unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: impl Into<Magnitude>, unit: Unit) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit,
        }
    }

    pub fn magnitude(&self) -> &Magnitude {
        &self.magnitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// The scalar value, if this is not an array quantity.
    pub fn value(&self) -> Option<f64> {
        self.magnitude.as_scalar()
    }

    pub fn into_parts(self) -> (Magnitude, Unit) {
        (self.magnitude, self.unit)
    }

    /// Express the same quantity in `target`.
    pub fn rescale(&self, target: &Unit) -> Result<Quantity, UnitError> {
        let factor = self.unit.conversion_factor(target)?;
        Ok(Quantity::new(self.magnitude.map(|v| v * factor), target.clone()))
    }
}
