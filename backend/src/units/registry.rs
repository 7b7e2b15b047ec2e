//! Per-request unit registry.
//!
//! The registry holds one reference unit per [`UnitFamily`] and maps any
//! quantity whose dimension matches a family onto that family's unit.
//! Families are always checked in the order of [`UnitFamily::ALL`]; the
//! first dimensional match wins.

use serde::{Deserialize, Serialize};

use super::dimension::Dimension;
use super::quantity::Quantity;
use super::unit::Unit;
use super::UnitError;

/// The three dimension groups the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Time,
    Amplitude,
    Rate,
}

impl UnitFamily {
    pub const ALL: [UnitFamily; 3] = [UnitFamily::Time, UnitFamily::Amplitude, UnitFamily::Rate];

    pub fn name(&self) -> &'static str {
        match self {
            UnitFamily::Time => "time",
            UnitFamily::Amplitude => "amplitude",
            UnitFamily::Rate => "rate",
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            UnitFamily::Time => Dimension::TIME,
            UnitFamily::Amplitude => Dimension::VOLTAGE,
            UnitFamily::Rate => Dimension::FREQUENCY,
        }
    }

    pub fn default_unit(&self) -> Unit {
        match self {
            UnitFamily::Time => Unit::millisecond(),
            UnitFamily::Amplitude => Unit::millivolt(),
            UnitFamily::Rate => Unit::hertz(),
        }
    }
}

/// Unit symbols requested by the caller, one optional entry per family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

impl UnitOverrides {
    pub fn get(&self, family: UnitFamily) -> Option<&str> {
        match family {
            UnitFamily::Time => self.time.as_deref(),
            UnitFamily::Amplitude => self.amplitude.as_deref(),
            UnitFamily::Rate => self.rate.as_deref(),
        }
    }

    /// Entries set in `self` win; the rest come from `fallback`.
    pub fn or(&self, fallback: &UnitOverrides) -> UnitOverrides {
        UnitOverrides {
            time: self.time.clone().or_else(|| fallback.time.clone()),
            amplitude: self.amplitude.clone().or_else(|| fallback.amplitude.clone()),
            rate: self.rate.clone().or_else(|| fallback.rate.clone()),
        }
    }
}

/// One reference unit per family. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRegistry {
    time: Unit,
    amplitude: Unit,
    rate: Unit,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self {
            time: UnitFamily::Time.default_unit(),
            amplitude: UnitFamily::Amplitude.default_unit(),
            rate: UnitFamily::Rate.default_unit(),
        }
    }
}

impl UnitRegistry {
    /// Build a registry, defaulting unset families to ms, mV and Hz.
    ///
    /// Fails with [`UnitError::InvalidUnit`] when an override is not a
    /// recognized symbol or does not belong to its family.
    pub fn new(overrides: &UnitOverrides) -> Result<Self, UnitError> {
        let resolve = |family: UnitFamily| -> Result<Unit, UnitError> {
            let Some(symbol) = overrides.get(family) else {
                return Ok(family.default_unit());
            };
            let unit = Unit::parse(symbol)?;
            if unit.dimension() != family.dimension() {
                return Err(UnitError::InvalidUnit {
                    symbol: symbol.to_string(),
                    reason: format!("not a {} unit (dimension {})", family.name(), unit.dimension()),
                });
            }
            Ok(unit)
        };

        Ok(Self {
            time: resolve(UnitFamily::Time)?,
            amplitude: resolve(UnitFamily::Amplitude)?,
            rate: resolve(UnitFamily::Rate)?,
        })
    }

    pub fn unit(&self, family: UnitFamily) -> &Unit {
        match family {
            UnitFamily::Time => &self.time,
            UnitFamily::Amplitude => &self.amplitude,
            UnitFamily::Rate => &self.rate,
        }
    }

    pub fn time(&self) -> &Unit {
        &self.time
    }

    pub fn amplitude(&self) -> &Unit {
        &self.amplitude
    }

    pub fn rate(&self) -> &Unit {
        &self.rate
    }

    /// The first family whose reference unit shares `unit`'s dimension.
    pub fn family_of(&self, unit: &Unit) -> Result<UnitFamily, UnitError> {
        UnitFamily::ALL
            .into_iter()
            .find(|family| self.unit(*family).dimension() == unit.dimension())
            .ok_or_else(|| UnitError::UnknownFamily {
                symbol: unit.symbol().to_string(),
            })
    }

    /// Rescale `quantity` into the reference unit of its family.
    pub fn canonicalize(&self, quantity: &Quantity) -> Result<Quantity, UnitError> {
        let family = self.family_of(quantity.unit())?;
        quantity.rescale(self.unit(family))
    }
}
