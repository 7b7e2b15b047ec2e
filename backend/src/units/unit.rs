//! Runtime unit symbols and their parser.
//!
//! A [`Unit`] pairs the symbol the caller wrote with its [`Dimension`] and a
//! scaling factor to the coherent SI unit of that dimension. Conversion uses
//! the same two-step formula for every unit:
//!
//! ```text
//! v_si  = v_src * src.scale
//! v_dst = v_si / dst.scale
//! ```
//!
//! Accepted symbols are the base symbols in [`BASE_UNITS`] (optionally with
//! an SI prefix when the base allows it), the long names in [`NAMED_UNITS`],
//! and products/quotients/integer powers of those, e.g. `mV/ms`, `1/s`,
//! `s**-1` or `m^2`.

use std::fmt;
use std::str::FromStr;

use super::dimension::Dimension;
use super::UnitError;

// =============================================================================
// Unit Metadata
// =============================================================================

/// Metadata about a base symbol in the lookup tables.
#[derive(Debug, Clone, Copy)]
struct UnitMeta {
    symbol: &'static str,
    dim: Dimension,
    /// Scaling factor to the coherent SI unit of `dim`.
    scale: f64,
    /// Whether SI prefixes may be attached (`ms`, `kHz`, ...).
    prefixable: bool,
}

const fn meta(symbol: &'static str, dim: Dimension, scale: f64, prefixable: bool) -> UnitMeta {
    UnitMeta {
        symbol,
        dim,
        scale,
        prefixable,
    }
}

const BASE_UNITS: &[UnitMeta] = &[
    meta("s", Dimension::TIME, 1.0, true),
    meta("min", Dimension::TIME, 60.0, false),
    meta("h", Dimension::TIME, 3600.0, false),
    meta("hr", Dimension::TIME, 3600.0, false),
    meta("d", Dimension::TIME, 86400.0, false),
    meta("Hz", Dimension::FREQUENCY, 1.0, true),
    meta("V", Dimension::VOLTAGE, 1.0, true),
    meta("A", Dimension::CURRENT, 1.0, true),
    meta("m", Dimension::LENGTH, 1.0, true),
    meta("g", Dimension::MASS, 1e-3, true),
    meta("dimensionless", Dimension::DIMENSIONLESS, 1.0, false),
];

const NAMED_UNITS: &[UnitMeta] = &[
    meta("sec", Dimension::TIME, 1.0, false),
    meta("second", Dimension::TIME, 1.0, false),
    meta("millisecond", Dimension::TIME, 1e-3, false),
    meta("microsecond", Dimension::TIME, 1e-6, false),
    meta("nanosecond", Dimension::TIME, 1e-9, false),
    meta("minute", Dimension::TIME, 60.0, false),
    meta("hour", Dimension::TIME, 3600.0, false),
    meta("day", Dimension::TIME, 86400.0, false),
    meta("hertz", Dimension::FREQUENCY, 1.0, false),
    meta("kilohertz", Dimension::FREQUENCY, 1e3, false),
    meta("volt", Dimension::VOLTAGE, 1.0, false),
    meta("millivolt", Dimension::VOLTAGE, 1e-3, false),
    meta("microvolt", Dimension::VOLTAGE, 1e-6, false),
    meta("ampere", Dimension::CURRENT, 1.0, false),
    meta("amp", Dimension::CURRENT, 1.0, false),
    meta("meter", Dimension::LENGTH, 1.0, false),
    meta("metre", Dimension::LENGTH, 1.0, false),
    meta("gram", Dimension::MASS, 1e-3, false),
];

const PREFIXES: &[(&str, f64)] = &[
    ("p", 1e-12),
    ("n", 1e-9),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("μ", 1e-6),
    ("m", 1e-3),
    ("c", 1e-2),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
];

// =============================================================================
// Unit
// =============================================================================

/// A unit of measurement resolved from a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    symbol: String,
    dimension: Dimension,
    scale: f64,
}

impl Unit {
    /// Build a unit from already-known parts. No validation is done.
    pub fn new(symbol: impl Into<String>, scale: f64, dimension: Dimension) -> Self {
        Self {
            symbol: symbol.into(),
            dimension,
            scale,
        }
    }

    pub fn millisecond() -> Self {
        Self::new("ms", 1e-3, Dimension::TIME)
    }

    pub fn millivolt() -> Self {
        Self::new("mV", 1e-3, Dimension::VOLTAGE)
    }

    pub fn hertz() -> Self {
        Self::new("Hz", 1.0, Dimension::FREQUENCY)
    }

    /// Parse a unit expression.
    pub fn parse(symbol: &str) -> Result<Self, UnitError> {
        let trimmed = symbol.trim();
        let (scale, dimension) = parse_expression(trimmed).map_err(|reason| {
            UnitError::InvalidUnit {
                symbol: symbol.to_string(),
                reason,
            }
        })?;
        Ok(Self::new(trimmed, scale, dimension))
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `1/unit`, e.g. the rate unit matching a time unit.
    pub fn reciprocal(&self) -> Result<Unit, UnitError> {
        let symbol = format!("1/{}", self.symbol);
        let dimension = Dimension::DIMENSIONLESS
            .div(self.dimension)
            .ok_or_else(|| UnitError::InvalidUnit {
                symbol: symbol.clone(),
                reason: EXPONENT_RANGE.to_string(),
            })?;
        Ok(Unit::new(symbol, 1.0 / self.scale, dimension))
    }

    /// Factor that converts a magnitude in `self` into `target`.
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64, UnitError> {
        if self.dimension != target.dimension {
            return Err(UnitError::Incompatible {
                from: self.symbol.clone(),
                to: target.symbol.clone(),
            });
        }
        if self.symbol == target.symbol {
            return Ok(1.0);
        }
        Ok(self.scale / target.scale)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

// =============================================================================
// Parser
// =============================================================================

const EXPONENT_RANGE: &str = "exponent out of range";

#[derive(Clone, Copy)]
enum Op {
    Mul,
    Div,
}

/// Parse `term (('*' | '/') term)*` into a total scale and dimension.
fn parse_expression(expr: &str) -> Result<(f64, Dimension), String> {
    if expr.is_empty() {
        return Err("empty unit symbol".to_string());
    }
    // `**` is the power operator; fold it into `^` so `*` is unambiguous.
    let expr = expr.replace("**", "^");

    let mut scale = 1.0;
    let mut dimension = Dimension::DIMENSIONLESS;
    let mut op = Op::Mul;
    let mut term = String::new();

    let mut apply = |op: Op, term: &str| -> Result<(), String> {
        let (term_scale, term_dim) = parse_term(term.trim())?;
        match op {
            Op::Mul => {
                scale *= term_scale;
                dimension = dimension.mul(term_dim).ok_or(EXPONENT_RANGE)?;
            }
            Op::Div => {
                scale /= term_scale;
                dimension = dimension.div(term_dim).ok_or(EXPONENT_RANGE)?;
            }
        }
        Ok(())
    };

    for ch in expr.chars() {
        match ch {
            '*' | '/' => {
                apply(op, &term)?;
                term.clear();
                op = if ch == '*' { Op::Mul } else { Op::Div };
            }
            _ => term.push(ch),
        }
    }
    apply(op, &term)?;

    if !scale.is_finite() || scale == 0.0 {
        return Err(format!("scale {} is not representable", scale));
    }
    Ok((scale, dimension))
}

/// Parse `atom ('^' int)?`.
fn parse_term(term: &str) -> Result<(f64, Dimension), String> {
    if term.is_empty() {
        return Err("dangling operator".to_string());
    }
    let (atom, exponent) = match term.split_once('^') {
        Some((atom, exp)) => {
            let exp: i8 = exp
                .trim()
                .parse()
                .map_err(|_| format!("invalid exponent '{}'", exp.trim()))?;
            (atom.trim(), exp)
        }
        None => (term, 1),
    };
    let (scale, dim) = lookup_atom(atom)?;
    let dim = dim.powi(exponent).ok_or(EXPONENT_RANGE)?;
    Ok((scale.powi(exponent as i32), dim))
}

fn lookup_atom(atom: &str) -> Result<(f64, Dimension), String> {
    if atom == "1" {
        return Ok((1.0, Dimension::DIMENSIONLESS));
    }
    if let Some(meta) = lookup_exact(atom) {
        return Ok((meta.scale, meta.dim));
    }
    for (prefix, factor) in PREFIXES {
        if let Some(rest) = atom.strip_prefix(prefix) {
            if let Some(meta) = BASE_UNITS
                .iter()
                .find(|m| m.prefixable && m.symbol == rest)
            {
                return Ok((factor * meta.scale, meta.dim));
            }
        }
    }
    Err(format!("unrecognized unit '{}'", atom))
}

/// Exact symbols win over prefixed readings, so `m` is metre and `min` minute.
fn lookup_exact(atom: &str) -> Option<UnitMeta> {
    if let Some(meta) = BASE_UNITS.iter().find(|m| m.symbol == atom) {
        return Some(*meta);
    }
    let singular = atom.strip_suffix('s').unwrap_or(atom);
    NAMED_UNITS
        .iter()
        .find(|m| m.symbol == atom || m.symbol == singular)
        .copied()
}
