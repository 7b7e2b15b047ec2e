//! Domain objects reconstructed from requests and handed to analysis functions.

pub mod event_train;
pub mod signal;
pub mod value;

pub use event_train::EventTrain;
pub use signal::ContinuousSignal;
pub use value::{Kwargs, Value};

use crate::units::UnitError;

/// Error type for constructing domain objects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("'{field}' must be in {expected} units, got '{unit}'")]
    Dimension {
        field: &'static str,
        expected: &'static str,
        unit: String,
    },

    #[error("'{field}' must be a scalar")]
    NotScalar { field: &'static str },

    #[error("sampling_rate must be positive and finite, got {0}")]
    InvalidSamplingRate(f64),

    #[error(transparent)]
    Unit(#[from] UnitError),
}
