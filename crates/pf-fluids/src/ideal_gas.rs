//! Ideal gas provider with a fixed compressibility factor.
//!
//! rho = P·M / (Z·R·T). Viscosity is held constant; at pipeline pressures the
//! pressure dependence of gas viscosity is small next to the correlations'
//! own uncertainty.

use crate::error::FluidResult;
use crate::model::FluidModel;
use crate::species::Species;
use crate::state::FluidProperties;
use pf_core::units::constants::R_UNIVERSAL;
use pf_core::units::{DynVisc, Pressure, Temperature, kg_per_m3, pa_s};

#[derive(Debug, Clone, Copy)]
pub struct IdealGasModel {
    compressibility: f64,
    viscosity: DynVisc,
}

impl Default for IdealGasModel {
    fn default() -> Self {
        Self {
            compressibility: 1.0,
            viscosity: pa_s(1.1e-5),
        }
    }
}

impl IdealGasModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compressibility(mut self, z: f64) -> Self {
        self.compressibility = z;
        self
    }

    pub fn with_viscosity(mut self, viscosity: DynVisc) -> Self {
        self.viscosity = viscosity;
        self
    }
}

impl FluidModel for IdealGasModel {
    fn name(&self) -> &str {
        "IdealGas"
    }

    fn supports(&self, species: Species) -> bool {
        !matches!(species, Species::H2O)
    }

    fn properties(
        &self,
        species: Species,
        pressure: Pressure,
        temperature: Temperature,
    ) -> FluidResult<FluidProperties> {
        let molar_mass_kg = species.molar_mass() * 1e-3;
        let rho = pressure.value * molar_mass_kg
            / (self.compressibility * R_UNIVERSAL * temperature.value);
        Ok(FluidProperties {
            density: kg_per_m3(rho),
            viscosity: self.viscosity,
            compressibility: self.compressibility,
            molecular_weight: species.molar_mass(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;
    use pf_core::units::{k, pa};

    #[test]
    fn air_at_standard_conditions() {
        let model = IdealGasModel::new();
        let props = model
            .properties(Species::Air, pa(101_325.0), k(288.15))
            .unwrap();
        assert!((props.density.value - 1.225).abs() < 2e-3);
    }

    #[test]
    fn compressibility_lowers_density() {
        let ideal = IdealGasModel::new();
        let real = IdealGasModel::new().with_compressibility(0.9);
        let a = ideal.properties(Species::CH4, pa(7e5), k(288.0)).unwrap();
        let b = real.properties(Species::CH4, pa(7e5), k(288.0)).unwrap();
        assert!(b.density.value > a.density.value);
        assert_eq!(b.compressibility, 0.9);
    }

    #[test]
    fn water_is_not_a_gas() {
        let model = IdealGasModel::new();
        assert!(model.state(Species::H2O, Phase::Gas, pa(1e5), k(300.0)).is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn density_linear_in_pressure(p in 1e4f64..2e7, t in 200.0f64..400.0) {
                let model = IdealGasModel::new();
                let a = model.properties(Species::CH4, pa(p), k(t)).unwrap();
                let b = model.properties(Species::CH4, pa(2.0 * p), k(t)).unwrap();
                prop_assert!((b.density.value / a.density.value - 2.0).abs() < 1e-9);
            }
        }
    }
}
