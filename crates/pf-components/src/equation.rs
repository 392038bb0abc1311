//! Flow equation selection.
//!
//! A closed decision table over (phase, flow type, length, diameter):
//!
//! | phase / flow type             | length      | diameter | equation               |
//! |-------------------------------|-------------|----------|------------------------|
//! | liquid, or incompressible     | any         | any      | Darcy-Weisbach         |
//! | gas and compressible          | > 20 mi     | >= 12 in | Modified Panhandle A   |
//! | gas and compressible          | > 20 mi     | < 12 in  | Modified Panhandle B   |
//! | gas and compressible          | <= 20 mi    | any      | Weymouth               |

use pf_core::units::Length;
use pf_core::units::field::{M_PER_IN, M_PER_MILE};
use pf_fluids::Phase;
use std::fmt;

/// Whether density changes along the segment are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowType {
    #[default]
    Compressible,
    Incompressible,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowType::Compressible => write!(f, "compressible"),
            FlowType::Incompressible => write!(f, "incompressible"),
        }
    }
}

impl std::str::FromStr for FlowType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compressible" => Ok(FlowType::Compressible),
            "incompressible" => Ok(FlowType::Incompressible),
            _ => Err("unknown flow type"),
        }
    }
}

/// The four supported flow correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowEquation {
    DarcyWeisbach,
    Weymouth,
    PanhandleA,
    PanhandleB,
}

impl FlowEquation {
    pub const ALL: [FlowEquation; 4] = [
        FlowEquation::DarcyWeisbach,
        FlowEquation::Weymouth,
        FlowEquation::PanhandleA,
        FlowEquation::PanhandleB,
    ];

    /// True for the closed-form gas transmission correlations.
    pub fn is_gas_correlation(&self) -> bool {
        !matches!(self, FlowEquation::DarcyWeisbach)
    }

    pub fn key(&self) -> &'static str {
        match self {
            FlowEquation::DarcyWeisbach => "darcy_weisbach",
            FlowEquation::Weymouth => "weymouth",
            FlowEquation::PanhandleA => "panhandle_a",
            FlowEquation::PanhandleB => "panhandle_b",
        }
    }
}

impl fmt::Display for FlowEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowEquation::DarcyWeisbach => write!(f, "Darcy-Weisbach"),
            FlowEquation::Weymouth => write!(f, "Weymouth"),
            FlowEquation::PanhandleA => write!(f, "Modified Panhandle A"),
            FlowEquation::PanhandleB => write!(f, "Modified Panhandle B"),
        }
    }
}

impl std::str::FromStr for FlowEquation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "darcyweisbach" | "dw" => Ok(FlowEquation::DarcyWeisbach),
            "weymouth" => Ok(FlowEquation::Weymouth),
            "panhandlea" | "modifiedpanhandlea" => Ok(FlowEquation::PanhandleA),
            "panhandleb" | "modifiedpanhandleb" => Ok(FlowEquation::PanhandleB),
            _ => Err("unknown flow equation"),
        }
    }
}

/// Gas lines strictly longer than this use a Panhandle correlation [m].
pub const LONG_LINE_LENGTH_M: f64 = 20.0 * M_PER_MILE;

/// Panhandle A applies from this bore upward [m].
pub const LARGE_BORE_DIAMETER_M: f64 = 12.0 * M_PER_IN;

// Unit round trips (e.g. 1 ft entered as 0.3048 m vs 12 in) must not move a
// boundary case across the table.
const BOUNDARY_REL_TOL: f64 = 1e-12;

/// Pick the correlation for a segment. Total over valid inputs.
pub fn select_flow_equation(
    phase: Phase,
    flow_type: FlowType,
    length: Length,
    diameter: Length,
) -> FlowEquation {
    if phase == Phase::Liquid || flow_type == FlowType::Incompressible {
        return FlowEquation::DarcyWeisbach;
    }

    let long_line = length.value > LONG_LINE_LENGTH_M * (1.0 + BOUNDARY_REL_TOL);
    if !long_line {
        return FlowEquation::Weymouth;
    }

    if diameter.value >= LARGE_BORE_DIAMETER_M * (1.0 - BOUNDARY_REL_TOL) {
        FlowEquation::PanhandleA
    } else {
        FlowEquation::PanhandleB
    }
}
