//! Physical dimensions as SI base-unit exponent vectors.

use std::fmt;

/// Exponents of the SI base units a quantity is built from.
///
/// Two units are dimensionally equal when their simplified exponent vectors
/// match, so `Hz` and `1/s` share the same dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub current: i8,
}

impl Dimension {
    pub const DIMENSIONLESS: Dimension = Dimension::new(0, 0, 0, 0);
    pub const LENGTH: Dimension = Dimension::new(1, 0, 0, 0);
    pub const MASS: Dimension = Dimension::new(0, 1, 0, 0);
    pub const TIME: Dimension = Dimension::new(0, 0, 1, 0);
    pub const CURRENT: Dimension = Dimension::new(0, 0, 0, 1);
    /// `1/s`
    pub const FREQUENCY: Dimension = Dimension::new(0, 0, -1, 0);
    /// `kg·m²·s⁻³·A⁻¹`
    pub const VOLTAGE: Dimension = Dimension::new(2, 1, -3, -1);

    pub const fn new(length: i8, mass: i8, time: i8, current: i8) -> Self {
        Self {
            length,
            mass,
            time,
            current,
        }
    }

    /// Product of two dimensions, `None` when an exponent leaves the `i8` range.
    pub fn mul(self, other: Dimension) -> Option<Dimension> {
        self.combine(other, i8::checked_add)
    }

    /// Quotient of two dimensions, `None` when an exponent leaves the `i8` range.
    pub fn div(self, other: Dimension) -> Option<Dimension> {
        self.combine(other, i8::checked_sub)
    }

    pub fn powi(self, n: i8) -> Option<Dimension> {
        Some(Dimension::new(
            self.length.checked_mul(n)?,
            self.mass.checked_mul(n)?,
            self.time.checked_mul(n)?,
            self.current.checked_mul(n)?,
        ))
    }

    fn combine(self, other: Dimension, op: fn(i8, i8) -> Option<i8>) -> Option<Dimension> {
        Some(Dimension::new(
            op(self.length, other.length)?,
            op(self.mass, other.mass)?,
            op(self.time, other.time)?,
            op(self.current, other.current)?,
        ))
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }
        let parts: Vec<String> = [
            ("m", self.length),
            ("kg", self.mass),
            ("s", self.time),
            ("A", self.current),
        ]
        .iter()
        .filter(|(_, exp)| *exp != 0)
        .map(|(sym, exp)| match exp {
            1 => sym.to_string(),
            _ => format!("{}**{}", sym, exp),
        })
        .collect();
        write!(f, "{}", parts.join("*"))
    }
}
