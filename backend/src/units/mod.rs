//! Units of measurement.
//!
//! Every quantity crossing the wire belongs to one of three families (time,
//! amplitude, rate). The [`UnitRegistry`] built for each request decides the
//! concrete unit of each family and converts outgoing quantities into it.

pub mod dimension;
pub mod quantity;
pub mod registry;
pub mod unit;

pub use dimension::Dimension;
pub use quantity::{Magnitude, Quantity};
pub use registry::{UnitFamily, UnitOverrides, UnitRegistry};
pub use unit::Unit;

/// Error type for unit resolution and conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    /// The symbol could not be parsed, or does not fit where it was used.
    #[error("Invalid unit '{symbol}': {reason}")]
    InvalidUnit { symbol: String, reason: String },

    /// No registry family shares the unit's dimension.
    #[error("Unknown units: '{symbol}'")]
    UnknownFamily { symbol: String },

    #[error("Cannot convert from '{from}' to '{to}': incompatible dimensions")]
    Incompatible { from: String, to: String },
}
