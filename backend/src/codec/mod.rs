//! Translation between the JSON wire format and the in-process value tree.
//!
//! ```text
//!   request JSON ──► RequestEnvelope ──► Deserializer ──► Kwargs ──► callable
//!                                            ▲                          │
//!                                       UnitRegistry                    ▼
//!   response JSON ◄──────────── serialize ◄──────────────────────── Value
//! ```

pub mod deserialize;
pub mod envelope;
pub mod serialize;

pub use deserialize::{deserialize, Deserializer};
pub use envelope::{EventTrainFields, RequestEnvelope, SignalFields, WireForm};
pub use serialize::{serialize, MAX_NESTING_DEPTH};

use crate::models::ModelError;
use crate::units::UnitError;

/// A request field could not be turned into a domain object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeserializeError {
    #[error("field '{field}': {message}")]
    Malformed { field: String, message: String },

    #[error("field '{field}': {source}")]
    Unit {
        field: String,
        #[source]
        source: UnitError,
    },

    #[error("field '{field}': {source}")]
    Model {
        field: String,
        #[source]
        source: ModelError,
    },
}

impl DeserializeError {
    pub(crate) fn malformed(field: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unit(field: &str, source: UnitError) -> Self {
        Self::Unit {
            field: field.to_string(),
            source,
        }
    }

    pub(crate) fn model(field: &str, source: ModelError) -> Self {
        Self::Model {
            field: field.to_string(),
            source,
        }
    }
}

/// A result could not be flattened into JSON.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerializeError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("result nesting exceeds {limit} levels")]
    TooDeep { limit: usize },
}
