//! Event trains (spike trains).

use crate::units::{Dimension, Magnitude, Quantity, Unit};

use super::ModelError;

/// Ordered event timestamps bounded by `[t_start, t_stop)`.
///
/// Timestamps and both bounds share one time unit; bounds given in another
/// time unit are rescaled on construction. Ordering and bound checks are left
/// to the analysis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTrain {
    times: Vec<f64>,
    unit: Unit,
    t_start: f64,
    t_stop: f64,
}

impl EventTrain {
    pub fn new(
        times: Vec<f64>,
        unit: Unit,
        t_start: &Quantity,
        t_stop: &Quantity,
    ) -> Result<Self, ModelError> {
        ensure_dimension("times", &unit, Dimension::TIME, "time")?;
        let t_start = bound("t_start", t_start, &unit)?;
        let t_stop = bound("t_stop", t_stop, &unit)?;
        Ok(Self {
            times,
            unit,
            t_start,
            t_stop,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn t_stop(&self) -> f64 {
        self.t_stop
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.t_stop - self.t_start
    }

    pub fn times_quantity(&self) -> Quantity {
        Quantity::new(self.times.clone(), self.unit.clone())
    }

    pub fn t_start_quantity(&self) -> Quantity {
        Quantity::new(self.t_start, self.unit.clone())
    }

    pub fn t_stop_quantity(&self) -> Quantity {
        Quantity::new(self.t_stop, self.unit.clone())
    }

    /// Same events with a different stop bound (in the train's unit).
    pub fn with_t_stop(mut self, t_stop: f64) -> Self {
        self.t_stop = t_stop;
        self
    }
}

pub(crate) fn ensure_dimension(
    field: &'static str,
    unit: &Unit,
    expected: Dimension,
    family: &'static str,
) -> Result<(), ModelError> {
    if unit.dimension() != expected {
        return Err(ModelError::Dimension {
            field,
            expected: family,
            unit: unit.symbol().to_string(),
        });
    }
    Ok(())
}

/// Rescale a scalar bound into `unit`.
fn bound(field: &'static str, value: &Quantity, unit: &Unit) -> Result<f64, ModelError> {
    ensure_dimension(field, value.unit(), Dimension::TIME, "time")?;
    match value.rescale(unit)?.magnitude() {
        Magnitude::Scalar(v) => Ok(*v),
        Magnitude::Array(_) => Err(ModelError::NotScalar { field }),
    }
}
