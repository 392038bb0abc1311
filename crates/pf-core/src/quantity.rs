//! Unit-tagged value parsing.
//!
//! Persisted configuration carries every dimensional value as `{value, unit}`.
//! This module maps a unit tag to an affine conversion into SI,
//! `si = (value + offset) * scale`, so the same table converts both ways.
//!
//! Plain `psi` is accepted and treated as absolute; pipeline operating data
//! is conventionally quoted that way. Use `psig` for gauge readings.

use crate::units::field::{M_PER_FT, M_PER_IN, M_PER_MILE, PA_PER_PSI};
use std::fmt;
use thiserror::Error;

/// Dimension/quantity family for a unit-tagged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    /// Absolute pressure (canonical: Pa)
    Pressure,
    /// Length, diameter, roughness, elevation (canonical: m)
    Length,
    /// Thermodynamic temperature (canonical: K)
    Temperature,
    /// Area (canonical: m²)
    Area,
    /// Dimensionless (canonical: as-is, `%` divides by 100)
    Dimensionless,
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressure => write!(f, "Pressure"),
            Self::Length => write!(f, "Length"),
            Self::Temperature => write!(f, "Temperature"),
            Self::Area => write!(f, "Area"),
            Self::Dimensionless => write!(f, "Dimensionless"),
        }
    }
}

/// Error in unit parsing or conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Input text did not parse to a number + optional unit
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unit not recognized for this quantity
    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: QuantityKind },

    /// Value out of physical range (e.g., negative absolute temperature)
    #[error("Value {value} out of range: {reason}")]
    OutOfRange { value: f64, reason: &'static str },
}

#[derive(Clone, Copy)]
struct Affine {
    scale: f64,
    offset: f64,
}

const fn linear(scale: f64) -> Affine {
    Affine { scale, offset: 0.0 }
}

fn lookup(unit: &str, kind: QuantityKind) -> Result<Affine, UnitError> {
    let tag = unit.trim().to_lowercase();
    let conv = match (kind, tag.as_str()) {
        (QuantityKind::Pressure, "pa" | "pascal") => linear(1.0),
        (QuantityKind::Pressure, "kpa") => linear(1e3),
        (QuantityKind::Pressure, "mpa") => linear(1e6),
        (QuantityKind::Pressure, "bar") => linear(1e5),
        (QuantityKind::Pressure, "barg") => Affine {
            scale: 1e5,
            offset: 1.013_25,
        },
        (QuantityKind::Pressure, "atm") => linear(101_325.0),
        (QuantityKind::Pressure, "psi" | "psia") => linear(PA_PER_PSI),
        (QuantityKind::Pressure, "psig") => Affine {
            scale: PA_PER_PSI,
            offset: 14.696,
        },

        (QuantityKind::Length, "m" | "meter" | "metre") => linear(1.0),
        (QuantityKind::Length, "mm") => linear(1e-3),
        (QuantityKind::Length, "cm") => linear(1e-2),
        (QuantityKind::Length, "km") => linear(1e3),
        (QuantityKind::Length, "ft" | "feet" | "foot") => linear(M_PER_FT),
        (QuantityKind::Length, "in" | "inch" | "inches") => linear(M_PER_IN),
        (QuantityKind::Length, "mi" | "mile" | "miles") => linear(M_PER_MILE),

        (QuantityKind::Temperature, "k" | "kelvin") => linear(1.0),
        (QuantityKind::Temperature, "c" | "°c" | "celsius") => Affine {
            scale: 1.0,
            offset: 273.15,
        },
        (QuantityKind::Temperature, "f" | "°f" | "fahrenheit") => Affine {
            scale: 5.0 / 9.0,
            offset: 459.67,
        },
        (QuantityKind::Temperature, "r" | "°r" | "rankine") => linear(5.0 / 9.0),

        (QuantityKind::Area, "m2" | "m^2" | "m²") => linear(1.0),
        (QuantityKind::Area, "cm2" | "cm^2" | "cm²") => linear(1e-4),
        (QuantityKind::Area, "mm2" | "mm^2" | "mm²") => linear(1e-6),
        (QuantityKind::Area, "in2" | "in^2" | "in²") => linear(M_PER_IN * M_PER_IN),
        (QuantityKind::Area, "ft2" | "ft^2" | "ft²") => linear(M_PER_FT * M_PER_FT),

        (QuantityKind::Dimensionless, "" | "-" | "ratio") => linear(1.0),
        (QuantityKind::Dimensionless, "%" | "percent") => linear(0.01),

        _ => {
            return Err(UnitError::UnknownUnit {
                unit: unit.to_string(),
                quantity: kind,
            });
        }
    };
    Ok(conv)
}

/// Convert `value` expressed in `unit` into the canonical SI value for `kind`.
pub fn convert_to_si(value: f64, unit: &str, kind: QuantityKind) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::OutOfRange {
            value,
            reason: "value must be finite",
        });
    }
    let conv = lookup(unit, kind)?;
    let si = (value + conv.offset) * conv.scale;

    match kind {
        QuantityKind::Temperature if si <= 0.0 => Err(UnitError::OutOfRange {
            value: si,
            reason: "Absolute temperature must be > 0 K",
        }),
        QuantityKind::Pressure if si < 0.0 => Err(UnitError::OutOfRange {
            value: si,
            reason: "Absolute pressure cannot be negative",
        }),
        QuantityKind::Area if si < 0.0 => Err(UnitError::OutOfRange {
            value: si,
            reason: "Area cannot be negative",
        }),
        _ => Ok(si),
    }
}

/// Express a canonical SI value in `unit`.
pub fn convert_from_si(si: f64, unit: &str, kind: QuantityKind) -> Result<f64, UnitError> {
    let conv = lookup(unit, kind)?;
    Ok(si / conv.scale - conv.offset)
}

/// Parse text such as `"100 psia"`, `"20mile"` or `"60 F"` into SI.
///
/// A bare number is taken to already be in SI.
pub fn parse_quantity(raw_text: &str, kind: QuantityKind) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(raw_text)?;
    if unit.is_empty() && kind != QuantityKind::Dimensionless {
        return Ok(value);
    }
    convert_to_si(value, &unit, kind)
}

/// Split a value+unit string into (numeric_value, unit_string).
///
/// Examples:
/// - "70F" -> (70.0, "F")
/// - "14.7 psia" -> (14.7, "psia")
/// - "300" -> (300.0, "")
fn split_value_and_unit(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();

    // Exponent markers only count when followed by a digit or sign, so "1e5Pa"
    // parses while "12 ft" is not mistaken for an exponent.
    let bytes = trimmed.as_bytes();
    let mut split_idx = trimmed.len();
    for (i, c) in trimmed.char_indices() {
        let numeric = c.is_ascii_digit() || c == '.' || c == '-' || c == '+';
        let exponent = (c == 'e' || c == 'E')
            && i > 0
            && bytes
                .get(i + 1)
                .is_some_and(|b| b.is_ascii_digit() || *b == b'-' || *b == b'+');
        if !numeric && !exponent {
            split_idx = i;
            break;
        }
    }

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = num_part.trim().parse().map_err(|_| {
        UnitError::ParseError(format!("Could not parse numeric value from '{}'", input))
    })?;

    Ok((value, unit_part.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_tags() {
        assert_eq!(convert_to_si(101_325.0, "Pa", QuantityKind::Pressure).unwrap(), 101_325.0);
        assert_eq!(convert_to_si(1.0, "bar", QuantityKind::Pressure).unwrap(), 1e5);
        let psi = convert_to_si(100.0, "psi", QuantityKind::Pressure).unwrap();
        let psia = convert_to_si(100.0, "PSIA", QuantityKind::Pressure).unwrap();
        assert_eq!(psi, psia);
        let psig = convert_to_si(0.0, "psig", QuantityKind::Pressure).unwrap();
        assert!((psig - 14.696 * PA_PER_PSI).abs() < 1e-6);
    }

    #[test]
    fn length_tags() {
        let mile = convert_to_si(20.0, "mile", QuantityKind::Length).unwrap();
        assert!((mile - 32_186.88).abs() < 1e-6);
        let inch = convert_to_si(12.0, "in", QuantityKind::Length).unwrap();
        assert!((inch - 0.3048).abs() < 1e-12);
    }

    #[test]
    fn temperature_tags() {
        let f = convert_to_si(60.0, "F", QuantityKind::Temperature).unwrap();
        assert!((f - 288.705_555).abs() < 1e-5);
        let c = convert_to_si(0.0, "C", QuantityKind::Temperature).unwrap();
        assert!((c - 273.15).abs() < 1e-12);
        assert!(convert_to_si(-500.0, "F", QuantityKind::Temperature).is_err());
    }

    #[test]
    fn unknown_unit_names_quantity() {
        let err = convert_to_si(1.0, "furlong", QuantityKind::Length).unwrap_err();
        assert!(matches!(
            err,
            UnitError::UnknownUnit { ref unit, quantity: QuantityKind::Length } if unit == "furlong"
        ));
        assert!(err.to_string().contains("Length"));
    }

    #[test]
    fn convert_back_from_si() {
        for (unit, kind, v) in [
            ("psig", QuantityKind::Pressure, 85.3),
            ("F", QuantityKind::Temperature, 60.0),
            ("mile", QuantityKind::Length, 20.0),
            ("mm2", QuantityKind::Area, 78.5),
        ] {
            let si = convert_to_si(v, unit, kind).unwrap();
            let back = convert_from_si(si, unit, kind).unwrap();
            assert!((back - v).abs() < 1e-9, "{unit}: {back} != {v}");
        }
    }

    #[test]
    fn parse_text_forms() {
        assert!((parse_quantity("100 psia", QuantityKind::Pressure).unwrap() - 689_475.729_3).abs() < 1e-3);
        assert!((parse_quantity("20mile", QuantityKind::Length).unwrap() - 32_186.88).abs() < 1e-6);
        assert_eq!(parse_quantity("1e5Pa", QuantityKind::Pressure).unwrap(), 1e5);
        assert_eq!(parse_quantity("300", QuantityKind::Temperature).unwrap(), 300.0);
        assert_eq!(parse_quantity("95%", QuantityKind::Dimensionless).unwrap(), 0.95);
        assert!(parse_quantity("abc", QuantityKind::Length).is_err());
    }
}
