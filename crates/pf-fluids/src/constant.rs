//! Incompressible provider with fixed density and viscosity.

use crate::error::{FluidError, FluidResult};
use crate::model::FluidModel;
use crate::species::Species;
use crate::state::FluidProperties;
use pf_core::units::{Density, DynVisc, Pressure, Temperature, kg_per_m3, pa_s};

/// Liquid (or any incompressible stream) whose properties do not depend on
/// the sampling point.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPropertyModel {
    density: Density,
    viscosity: DynVisc,
}

impl ConstantPropertyModel {
    pub fn new(density: Density, viscosity: DynVisc) -> FluidResult<Self> {
        if !density.value.is_finite() || density.value <= 0.0 {
            return Err(FluidError::InvalidArg {
                what: "constant density must be positive",
            });
        }
        if !viscosity.value.is_finite() || viscosity.value <= 0.0 {
            return Err(FluidError::InvalidArg {
                what: "constant viscosity must be positive",
            });
        }
        Ok(Self { density, viscosity })
    }

    /// Water near 15 °C.
    pub fn water() -> Self {
        Self {
            density: kg_per_m3(999.1),
            viscosity: pa_s(1.138e-3),
        }
    }
}

impl FluidModel for ConstantPropertyModel {
    fn name(&self) -> &str {
        "ConstantProperty"
    }

    fn supports(&self, _species: Species) -> bool {
        true
    }

    fn properties(
        &self,
        species: Species,
        _pressure: Pressure,
        _temperature: Temperature,
    ) -> FluidResult<FluidProperties> {
        Ok(FluidProperties {
            density: self.density,
            viscosity: self.viscosity,
            compressibility: 1.0,
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
    fn properties_ignore_conditions() {
        let model = ConstantPropertyModel::water();
        let a = model.state(Species::H2O, Phase::Liquid, pa(1e5), k(290.0)).unwrap();
        let b = model.state(Species::H2O, Phase::Liquid, pa(5e6), k(310.0)).unwrap();
        assert_eq!(a.properties, b.properties);
        assert!((a.specific_gravity() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_constants() {
        assert!(ConstantPropertyModel::new(kg_per_m3(0.0), pa_s(1e-3)).is_err());
        assert!(ConstantPropertyModel::new(kg_per_m3(800.0), pa_s(-1.0)).is_err());
    }
}
