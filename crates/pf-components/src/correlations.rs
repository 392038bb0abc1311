//! Closed-form flow correlations.
//!
//! Gas transmission equations are evaluated in oilfield units (psia, miles,
//! inches, °R) and return standard cubic feet per day at 14.7 psia / 520 °R.
//! Darcy-Weisbach is evaluated in SI.

use crate::equation::FlowEquation;
use crate::error::{ComponentError, ComponentResult};
use pf_core::units::constants::WATER_DENSITY_KG_M3;
use pf_core::units::field::{BASE_PRESSURE_PSIA, BASE_TEMPERATURE_R};
use std::f64::consts::PI;

/// Power-law parameters of a gas transmission equation:
/// `Q = C·(Tb/Pb)^a·((P1² − eˢP2²)/(SG^g·L′·T·Z))^n·D^d·E`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCorrelation {
    pub constant: f64,
    pub base_exponent: f64,
    pub flow_exponent: f64,
    pub gravity_exponent: f64,
    pub diameter_exponent: f64,
}

pub const WEYMOUTH: GasCorrelation = GasCorrelation {
    constant: 433.5,
    base_exponent: 1.0,
    flow_exponent: 0.5,
    gravity_exponent: 1.0,
    diameter_exponent: 2.667,
};

pub const PANHANDLE_A: GasCorrelation = GasCorrelation {
    constant: 435.87,
    base_exponent: 1.0788,
    flow_exponent: 0.5394,
    gravity_exponent: 0.8539,
    diameter_exponent: 2.6182,
};

pub const PANHANDLE_B: GasCorrelation = GasCorrelation {
    constant: 737.0,
    base_exponent: 1.02,
    flow_exponent: 0.51,
    gravity_exponent: 0.961,
    diameter_exponent: 2.52,
};

impl FlowEquation {
    /// Parameters for the gas correlations; `None` for Darcy-Weisbach.
    pub fn gas_correlation(&self) -> Option<&'static GasCorrelation> {
        match self {
            FlowEquation::DarcyWeisbach => None,
            FlowEquation::Weymouth => Some(&WEYMOUTH),
            FlowEquation::PanhandleA => Some(&PANHANDLE_A),
            FlowEquation::PanhandleB => Some(&PANHANDLE_B),
        }
    }
}

/// Inputs to a gas correlation, already in oilfield units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasFlowInputs {
    pub upstream_psia: f64,
    pub downstream_psia: f64,
    pub specific_gravity: f64,
    pub length_miles: f64,
    /// Outlet minus inlet elevation [ft]
    pub elevation_change_ft: f64,
    pub temperature_r: f64,
    pub compressibility: f64,
    pub diameter_in: f64,
    pub efficiency: f64,
}

/// Elevation correction `s = 0.0375·SG·Δh/T` (Δh in ft, T in °R).
pub fn elevation_slope(specific_gravity: f64, elevation_change_ft: f64, temperature_r: f64) -> f64 {
    0.0375 * specific_gravity * elevation_change_ft / temperature_r
}

/// Equivalent length `L′ = L·(eˢ − 1)/s`, or `L` on level ground.
pub fn corrected_length(length: f64, s: f64) -> f64 {
    if s == 0.0 {
        length
    } else {
        length * s.exp_m1() / s
    }
}

impl GasCorrelation {
    fn transmission_factor(&self, inputs: &GasFlowInputs) -> f64 {
        self.constant
            * (BASE_TEMPERATURE_R / BASE_PRESSURE_PSIA).powf(self.base_exponent)
            * inputs.diameter_in.powf(self.diameter_exponent)
            * inputs.efficiency
    }

    fn resistance(&self, inputs: &GasFlowInputs, s: f64) -> f64 {
        inputs.specific_gravity.powf(self.gravity_exponent)
            * corrected_length(inputs.length_miles, s)
            * inputs.temperature_r
            * inputs.compressibility
    }

    /// Standard flow rate [scf/day].
    pub fn flow_scf_per_day(&self, inputs: &GasFlowInputs) -> ComponentResult<f64> {
        let s = elevation_slope(
            inputs.specific_gravity,
            inputs.elevation_change_ft,
            inputs.temperature_r,
        );
        let p1 = inputs.upstream_psia;
        let p2 = inputs.downstream_psia;
        let pressure_term = p1 * p1 - s.exp() * p2 * p2;

        if pressure_term < 0.0 {
            return Err(ComponentError::configuration(format!(
                "pressure term P1²−eˢP2² = {pressure_term:.3} psia² is negative; \
                 inlet pressure cannot lift the gas over the elevation change"
            )));
        }

        let q = self.transmission_factor(inputs)
            * (pressure_term / self.resistance(inputs, s)).powf(self.flow_exponent);
        Ok(q)
    }

    /// Outlet pressure [psia] that sustains `flow_scfd` from `inputs.upstream_psia`.
    /// `inputs.downstream_psia` is ignored.
    pub fn downstream_pressure_for_flow(
        &self,
        inputs: &GasFlowInputs,
        flow_scfd: f64,
    ) -> ComponentResult<f64> {
        if flow_scfd < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "flow rate must be non-negative",
            });
        }
        let s = elevation_slope(
            inputs.specific_gravity,
            inputs.elevation_change_ft,
            inputs.temperature_r,
        );
        let x = flow_scfd / self.transmission_factor(inputs);
        let pressure_term = x.powf(1.0 / self.flow_exponent) * self.resistance(inputs, s);
        let p1 = inputs.upstream_psia;
        let p2_sq = (p1 * p1 - pressure_term) / s.exp();

        if p2_sq < 0.0 {
            return Err(ComponentError::configuration(format!(
                "flow of {flow_scfd:.0} scf/day exceeds what {p1:.2} psia can deliver"
            )));
        }
        Ok(p2_sq.sqrt())
    }
}

/// Unit constant in `Q = √(ΔP·D⁵/(k·f·L·SG))` for SI inputs, `k = 8·ρ_water/π²`.
pub const DARCY_WEISBACH_K: f64 = 8.0 * WATER_DENSITY_KG_M3 / (PI * PI);

/// Volumetric flow [m³/s] from pressure drop [Pa], diameter [m],
/// Darcy friction factor, length [m] and specific gravity.
pub fn darcy_weisbach_flow(
    pressure_drop: f64,
    diameter: f64,
    friction_factor: f64,
    length: f64,
    specific_gravity: f64,
) -> f64 {
    (pressure_drop * diameter.powi(5)
        / (DARCY_WEISBACH_K * friction_factor * length * specific_gravity))
        .sqrt()
}

/// Pressure drop [Pa] for flow [m³/s]; inverse of [`darcy_weisbach_flow`].
pub fn darcy_weisbach_pressure_drop(
    flow: f64,
    diameter: f64,
    friction_factor: f64,
    length: f64,
    specific_gravity: f64,
) -> f64 {
    DARCY_WEISBACH_K * friction_factor * length * specific_gravity * flow * flow / diameter.powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methane_line() -> GasFlowInputs {
        GasFlowInputs {
            upstream_psia: 100.0,
            downstream_psia: 98.0,
            specific_gravity: 0.554,
            length_miles: 20.0,
            elevation_change_ft: 0.0,
            temperature_r: 519.67,
            compressibility: 0.998,
            diameter_in: 12.0,
            efficiency: 0.95,
        }
    }

    #[test]
    fn corrected_length_level_ground() {
        assert_eq!(corrected_length(20.0, 0.0), 20.0);
        // Small slope approaches L
        assert!((corrected_length(20.0, 1e-9) - 20.0).abs() < 1e-6);
        // Uphill lengthens
        assert!(corrected_length(20.0, 0.05) > 20.0);
    }

    #[test]
    fn weymouth_reference_value() {
        // Hand evaluation of the Weymouth expression for the inputs above.
        let q = WEYMOUTH.flow_scf_per_day(&methane_line()).unwrap();
        assert!((q / 2.889e6 - 1.0).abs() < 1e-3, "q = {q}");
    }

    #[test]
    fn correlations_agree_in_magnitude() {
        let inputs = methane_line();
        let w = WEYMOUTH.flow_scf_per_day(&inputs).unwrap();
        let a = PANHANDLE_A.flow_scf_per_day(&inputs).unwrap();
        let b = PANHANDLE_B.flow_scf_per_day(&inputs).unwrap();
        for q in [a, b] {
            let ratio = q / w;
            assert!(ratio > 0.5 && ratio < 2.0, "ratio = {ratio}");
        }
    }

    #[test]
    fn uphill_reduces_flow() {
        let level = methane_line();
        let uphill = GasFlowInputs {
            elevation_change_ft: 500.0,
            ..level
        };
        let q_level = PANHANDLE_A.flow_scf_per_day(&level).unwrap();
        let q_up = PANHANDLE_A.flow_scf_per_day(&uphill).unwrap();
        assert!(q_up < q_level);
    }

    #[test]
    fn negative_pressure_term_is_configuration_error() {
        let inputs = GasFlowInputs {
            upstream_psia: 100.0,
            downstream_psia: 99.9,
            elevation_change_ft: 20_000.0,
            ..methane_line()
        };
        let err = WEYMOUTH.flow_scf_per_day(&inputs).unwrap_err();
        assert!(matches!(err, ComponentError::Configuration { .. }));
    }

    #[test]
    fn gas_inverse_recovers_outlet_pressure() {
        for corr in [WEYMOUTH, PANHANDLE_A, PANHANDLE_B] {
            let inputs = GasFlowInputs {
                elevation_change_ft: 150.0,
                ..methane_line()
            };
            let q = corr.flow_scf_per_day(&inputs).unwrap();
            let p2 = corr.downstream_pressure_for_flow(&inputs, q).unwrap();
            assert!((p2 - 98.0).abs() < 1e-8, "p2 = {p2}");
        }
    }

    #[test]
    fn darcy_weisbach_inverse() {
        let (d, f, l, sg) = (0.2, 0.018, 1000.0, 0.85);
        let q = darcy_weisbach_flow(50_000.0, d, f, l, sg);
        let dp = darcy_weisbach_pressure_drop(q, d, f, l, sg);
        assert!((dp - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn darcy_weisbach_matches_velocity_form() {
        // ΔP = f·(L/D)·ρ·v²/2 with ρ = SG·ρ_water
        let (d, f, l, sg, v) = (0.1, 0.02, 100.0, 1.0, 2.0);
        let rho = sg * WATER_DENSITY_KG_M3;
        let dp = f * (l / d) * rho * v * v / 2.0;
        let q = darcy_weisbach_flow(dp, d, f, l, sg);
        let area = PI * d * d / 4.0;
        assert!((q / area - v).abs() < 1e-9);
    }
}
