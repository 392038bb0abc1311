//! CoolProp-based fluid property provider.

use crate::error::{FluidError, FluidResult};
use crate::model::FluidModel;
use crate::species::Species;
use crate::state::FluidProperties;
use pf_core::units::{Pressure, Temperature, kg_per_m3, pa_s};
use rfluids::prelude::*;

/// CoolProp backend for fluid properties.
///
/// Thread-safe: rfluids Fluid instances are created per query and never shared.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoolPropModel {}

impl CoolPropModel {
    /// Create a new CoolProp model.
    pub fn new() -> Self {
        Self {}
    }

    /// Create a Fluid instance at given P,T state.
    fn fluid_at_pt(&self, species: Species, p_pa: f64, t_k: f64) -> FluidResult<Fluid> {
        Fluid::from(species.rfluids_pure())
            .in_state(FluidInput::pressure(p_pa), FluidInput::temperature(t_k))
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at P={} Pa, T={} K: {}", p_pa, t_k, e),
            })
    }
}

impl FluidModel for CoolPropModel {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn supports(&self, _species: Species) -> bool {
        true
    }

    fn properties(
        &self,
        species: Species,
        pressure: Pressure,
        temperature: Temperature,
    ) -> FluidResult<FluidProperties> {
        let mut fluid = self.fluid_at_pt(species, pressure.value, temperature.value)?;

        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let mu = fluid.dynamic_viscosity().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting viscosity: {}", e),
        })?;
        let z = fluid.compressibility().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting compressibility: {}", e),
        })?;

        Ok(FluidProperties {
            density: kg_per_m3(rho),
            viscosity: pa_s(mu),
            compressibility: z,
            molecular_weight: species.molar_mass(),
        })
    }
}
