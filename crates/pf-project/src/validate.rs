//! Pipeline configuration validation.
//!
//! Runs on the persisted record tree before anything is compiled, so every
//! message names the segment and field as the user wrote them.

use crate::schema::{LeakDef, PipelineDef, SegmentDef, UnitValueDef};
use pf_core::{QuantityKind, UnitError, convert_to_si};
use pf_core::units::constants::ATM_PA;
use pf_fluids::Species;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid unit for {field}: {source}")]
    Unit { field: String, source: UnitError },

    #[error("Unknown species: {species}")]
    UnknownSpecies { species: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Convert a unit-tagged value to SI, naming `field` on failure.
pub(crate) fn to_si(
    field: &str,
    value: &UnitValueDef,
    kind: QuantityKind,
) -> Result<f64, ValidationError> {
    if !value.value.is_finite() {
        return Err(invalid(field, value.value, "must be finite"));
    }
    convert_to_si(value.value, &value.unit, kind).map_err(|source| ValidationError::Unit {
        field: field.to_string(),
        source,
    })
}

pub fn validate_pipeline(pipeline: &PipelineDef) -> Result<(), ValidationError> {
    if pipeline.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: pipeline.version,
        });
    }
    if pipeline.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    let fluid = &pipeline.fluid;
    if fluid.species.parse::<Species>().is_err() {
        return Err(ValidationError::UnknownSpecies {
            species: fluid.species.clone(),
        });
    }
    let t = to_si("fluid.temperature", &fluid.temperature, QuantityKind::Temperature)?;
    if t <= 0.0 {
        return Err(invalid("fluid.temperature", t, "must be above absolute zero"));
    }
    if let Some(mw) = fluid.molecular_weight
        && !(mw.is_finite() && mw > 0.0)
    {
        return Err(invalid("fluid.molecular_weight", mw, "must be positive"));
    }

    let default_ambient = match &pipeline.ambient_pressure {
        Some(p) => to_si("ambient_pressure", p, QuantityKind::Pressure)?,
        None => ATM_PA,
    };
    if default_ambient < 0.0 {
        return Err(invalid("ambient_pressure", default_ambient, "must be non-negative"));
    }

    let mut names = HashSet::new();
    for segment in &pipeline.segments {
        if !names.insert(segment.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: segment.name.clone(),
                context: "segments".to_string(),
            });
        }
        validate_segment(segment, default_ambient)?;
    }

    if let Some(solver) = &pipeline.solver {
        if !(solver.friction_tolerance.is_finite() && solver.friction_tolerance > 0.0) {
            return Err(invalid(
                "solver.friction_tolerance",
                solver.friction_tolerance,
                "must be positive",
            ));
        }
        if solver.max_friction_iterations == 0 || solver.max_outer_iterations == 0 {
            return Err(invalid("solver", "0", "iteration caps must be at least 1"));
        }
        if !(solver.initial_friction_factor.is_finite() && solver.initial_friction_factor > 0.0) {
            return Err(invalid(
                "solver.initial_friction_factor",
                solver.initial_friction_factor,
                "must be positive",
            ));
        }
        for (field, v) in [
            ("solver.balance_tolerance", solver.balance_tolerance),
            ("solver.mass_balance_threshold", solver.mass_balance_threshold),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(invalid(field, v, "must be non-negative"));
            }
        }
    }

    Ok(())
}

fn validate_segment(segment: &SegmentDef, default_ambient: f64) -> Result<(), ValidationError> {
    let field = |name: &str| format!("segments[{}].{name}", segment.name);

    let length = to_si(&field("length"), &segment.length, QuantityKind::Length)?;
    if length <= 0.0 {
        return Err(invalid(field("length"), length, "must be positive"));
    }
    let diameter = to_si(&field("diameter"), &segment.diameter, QuantityKind::Length)?;
    if diameter <= 0.0 {
        return Err(invalid(field("diameter"), diameter, "must be positive"));
    }
    if let Some(r) = &segment.roughness {
        let roughness = to_si(&field("roughness"), r, QuantityKind::Length)?;
        if roughness < 0.0 {
            return Err(invalid(field("roughness"), roughness, "must be non-negative"));
        }
    }
    if let Some(e) = &segment.elevation_change {
        to_si(&field("elevation_change"), e, QuantityKind::Length)?;
    }
    if !(segment.efficiency > 0.0 && segment.efficiency <= 1.0) {
        return Err(invalid(field("efficiency"), segment.efficiency, "must be in (0, 1]"));
    }
    if let Some(t) = &segment.temperature {
        let t = to_si(&field("temperature"), t, QuantityKind::Temperature)?;
        if t <= 0.0 {
            return Err(invalid(field("temperature"), t, "must be above absolute zero"));
        }
    }

    let ambient = match &segment.ambient_pressure {
        Some(p) => to_si(&field("ambient_pressure"), p, QuantityKind::Pressure)?,
        None => default_ambient,
    };
    let upstream = to_si(
        &field("upstream_pressure"),
        &segment.upstream_pressure,
        QuantityKind::Pressure,
    )?;
    let downstream = to_si(
        &field("downstream_pressure"),
        &segment.downstream_pressure,
        QuantityKind::Pressure,
    )?;
    if upstream < ambient {
        return Err(invalid(field("upstream_pressure"), upstream, "below ambient pressure"));
    }
    if downstream < ambient {
        return Err(invalid(field("downstream_pressure"), downstream, "below ambient pressure"));
    }
    if downstream > upstream {
        return Err(invalid(
            field("downstream_pressure"),
            downstream,
            "exceeds upstream pressure",
        ));
    }

    let mut positions = HashSet::new();
    for valve in &segment.valves {
        if !positions.insert(valve.position) {
            return Err(ValidationError::DuplicateName {
                name: format!("{:?}", valve.position).to_lowercase(),
                context: field("valves"),
            });
        }
    }

    for (i, leak) in segment.leaks.iter().enumerate() {
        validate_leak(leak, &format!("{}[{i}]", field("leaks")), diameter)?;
    }
    Ok(())
}

/// Orifice diameter of a leak in metres, from whichever size it carries.
pub(crate) fn leak_diameter(leak: &LeakDef, field: &str) -> Result<f64, ValidationError> {
    match (&leak.diameter, &leak.area) {
        (Some(d), None) => to_si(&format!("{field}.diameter"), d, QuantityKind::Length),
        (None, Some(a)) => {
            let area = to_si(&format!("{field}.area"), a, QuantityKind::Area)?;
            Ok(2.0 * (area.max(0.0) / std::f64::consts::PI).sqrt())
        }
        (Some(_), Some(_)) => Err(invalid(field, "diameter+area", "give diameter or area, not both")),
        (None, None) => Err(invalid(field, "none", "needs a diameter or an area")),
    }
}

fn validate_leak(leak: &LeakDef, field: &str, pipe_diameter: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&leak.location) {
        return Err(invalid(format!("{field}.location"), leak.location, "must be in [0, 1]"));
    }
    let cd = leak.discharge_coefficient;
    if !(cd > 0.0 && cd <= 1.0) {
        return Err(invalid(format!("{field}.discharge_coefficient"), cd, "must be in (0, 1]"));
    }
    let d = leak_diameter(leak, field)?;
    if d <= 0.0 {
        return Err(invalid(format!("{field}.diameter"), d, "must be positive"));
    }
    if d > pipe_diameter {
        return Err(invalid(
            format!("{field}.diameter"),
            d,
            "larger than the pipe diameter",
        ));
    }
    Ok(())
}
