//! Fluid state at a single sampling point.

use crate::species::Species;
use pf_core::units::constants::{AIR_MOLAR_MASS_G_PER_MOL, WATER_DENSITY_KG_M3};
use pf_core::units::{Density, DynVisc, Pressure, Temperature};
use std::fmt;

/// Bulk phase of the transported fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Liquid,
    Gas,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Liquid => write!(f, "liquid"),
            Phase::Gas => write!(f, "gas"),
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liquid" => Ok(Phase::Liquid),
            "gas" | "vapor" | "vapour" => Ok(Phase::Gas),
            _ => Err("unknown phase"),
        }
    }
}

/// Properties returned by a provider for one (species, P, T) query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    pub density: Density,
    pub viscosity: DynVisc,
    /// Compressibility factor Z (dimensionless)
    pub compressibility: f64,
    /// Molecular weight [g/mol]
    pub molecular_weight: f64,
}

/// Fluid identity plus the properties at the conditions a calculation uses.
///
/// Never cached across segments: pressure changes along the chain, so every
/// sampling point asks the provider again.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    pub species: Species,
    pub phase: Phase,
    pub pressure: Pressure,
    pub temperature: Temperature,
    pub properties: FluidProperties,
}

impl FluidState {
    pub fn density(&self) -> Density {
        self.properties.density
    }

    pub fn viscosity(&self) -> DynVisc {
        self.properties.viscosity
    }

    pub fn compressibility(&self) -> f64 {
        self.properties.compressibility
    }

    pub fn molecular_weight(&self) -> f64 {
        self.properties.molecular_weight
    }

    /// Specific gravity: against air by molecular weight for gases, against
    /// water by density for liquids.
    pub fn specific_gravity(&self) -> f64 {
        match self.phase {
            Phase::Gas => self.properties.molecular_weight / AIR_MOLAR_MASS_G_PER_MOL,
            Phase::Liquid => self.properties.density.value / WATER_DENSITY_KG_M3,
        }
    }
}
