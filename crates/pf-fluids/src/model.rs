//! Fluid property provider trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use crate::state::{FluidProperties, FluidState, Phase};
use pf_core::units::{Pressure, Temperature};

/// Trait for fluid property providers.
///
/// Implementations must be thread-safe (Send + Sync) so independent pipelines
/// can be solved in parallel against one shared provider.
pub trait FluidModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this model can answer queries for the species.
    fn supports(&self, species: Species) -> bool;

    /// Raw property lookup at (P, T).
    fn properties(
        &self,
        species: Species,
        pressure: Pressure,
        temperature: Temperature,
    ) -> FluidResult<FluidProperties>;

    /// Validated fluid state at a sampling point.
    ///
    /// Rejects non-physical inputs before querying and non-physical outputs
    /// after, so callers never see a zero or NaN density.
    fn state(
        &self,
        species: Species,
        phase: Phase,
        pressure: Pressure,
        temperature: Temperature,
    ) -> FluidResult<FluidState> {
        if !self.supports(species) {
            return Err(FluidError::NotSupported {
                what: format!("{} does not provide {}", self.name(), species.display_name()),
            });
        }
        validation::validate_pressure(pressure)?;
        validation::validate_temperature(temperature)?;

        let properties = self.properties(species, pressure, temperature)?;
        validation::validate_properties(&properties)?;

        Ok(FluidState {
            species,
            phase,
            pressure,
            temperature,
            properties,
        })
    }
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_properties(props: &FluidProperties) -> FluidResult<()> {
        if !props.density.value.is_finite() || props.density.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        if !props.viscosity.value.is_finite() || props.viscosity.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "viscosity must be positive and finite",
            });
        }
        if !props.compressibility.is_finite() || props.compressibility <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "compressibility factor must be positive and finite",
            });
        }
        if !props.molecular_weight.is_finite() || props.molecular_weight <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "molecular weight must be positive and finite",
            });
        }
        Ok(())
    }
}
