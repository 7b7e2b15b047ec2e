//! Continuous, regularly sampled signals.

use crate::units::{Dimension, Magnitude, Quantity, Unit};

use super::event_train::ensure_dimension;
use super::ModelError;

/// Samples taken at a fixed rate starting at `t_start`.
///
/// The sample unit is not restricted here; a signal in an unsupported unit
/// (e.g. a current in pA) only fails when it is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousSignal {
    samples: Vec<f64>,
    unit: Unit,
    sampling_rate: Quantity,
    t_start: Quantity,
}

impl ContinuousSignal {
    pub fn new(
        samples: Vec<f64>,
        unit: Unit,
        sampling_rate: Quantity,
        t_start: Quantity,
    ) -> Result<Self, ModelError> {
        ensure_dimension("sampling_rate", sampling_rate.unit(), Dimension::FREQUENCY, "rate")?;
        ensure_dimension("t_start", t_start.unit(), Dimension::TIME, "time")?;
        let rate = match sampling_rate.magnitude() {
            Magnitude::Scalar(v) => *v,
            Magnitude::Array(_) => return Err(ModelError::NotScalar { field: "sampling_rate" }),
        };
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ModelError::InvalidSamplingRate(rate));
        }
        if t_start.value().is_none() {
            return Err(ModelError::NotScalar { field: "t_start" });
        }
        Ok(Self {
            samples,
            unit,
            sampling_rate,
            t_start,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn sampling_rate(&self) -> &Quantity {
        &self.sampling_rate
    }

    pub fn t_start(&self) -> &Quantity {
        &self.t_start
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples_quantity(&self) -> Quantity {
        Quantity::new(self.samples.clone(), self.unit.clone())
    }

    /// Seconds between samples expressed in the unit of `t_start`.
    pub fn sampling_period(&self) -> f64 {
        let rate_si = self.sampling_rate.value().unwrap_or(f64::NAN) * self.sampling_rate.unit().scale();
        1.0 / rate_si / self.t_start.unit().scale()
    }

    /// Time of sample `index`, in the unit of `t_start`.
    pub fn sample_time(&self, index: usize) -> f64 {
        self.t_start.value().unwrap_or(0.0) + index as f64 * self.sampling_period()
    }

    /// End of the signal (one period past the last sample), in the unit of `t_start`.
    pub fn t_stop(&self) -> f64 {
        self.sample_time(self.samples.len())
    }

    /// Same timing with new samples in `unit`.
    pub fn with_samples(&self, samples: Vec<f64>, unit: Unit) -> Self {
        Self {
            samples,
            unit,
            sampling_rate: self.sampling_rate.clone(),
            t_start: self.t_start.clone(),
        }
    }
}
