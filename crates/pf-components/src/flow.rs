//! Segment flow calculator.
//!
//! Given a segment and a fluid state sampled at its mean conditions, select
//! the correlation and return the volumetric flow it supports.
//!
//! Flow basis differs by correlation: Darcy-Weisbach returns flow at the
//! sampled (operating) conditions, the gas correlations return flow at base
//! conditions (14.7 psia, 520 °R).

use crate::common::{EPSILON_PRESSURE, check_finite, check_positive};
use crate::correlations::{GasFlowInputs, darcy_weisbach_flow, darcy_weisbach_pressure_drop};
use crate::equation::{FlowEquation, select_flow_equation};
use crate::error::{ComponentError, ComponentResult};
use crate::friction::{FrictionEstimate, FrictionSettings, FrictionWarning, friction_factor};
use crate::segment::Segment;
use pf_core::units::constants::WATER_DENSITY_KG_M3;
use pf_core::units::field::{
    self, BASE_PRESSURE_PSIA, BASE_TEMPERATURE_R, PA_PER_PSI, to_ft, to_inches, to_miles, to_psi,
    to_rankine, to_scf_per_day,
};
use pf_core::units::{Density, MassRate, Pressure, Velocity, VolumeRate, kgps, m3ps, mps, pa};
use pf_fluids::FluidState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSettings {
    pub friction: FrictionSettings,
    /// Seed for the Darcy-Weisbach friction/flow fixed point
    pub initial_friction_factor: f64,
    pub max_outer_iterations: usize,
    pub outer_rel_tol: f64,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            friction: FrictionSettings::default(),
            initial_friction_factor: 0.02,
            max_outer_iterations: 50,
            outer_rel_tol: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFlow {
    pub equation: FlowEquation,
    pub flow: VolumeRate,
    /// Mean velocity at operating conditions
    pub velocity: Velocity,
    pub reynolds: f64,
    /// Present on the Darcy-Weisbach path only
    pub friction: Option<FrictionEstimate>,
    /// Density on the same basis as `flow`: operating conditions for
    /// Darcy-Weisbach, base conditions for the gas correlations
    pub basis_density: Density,
}

impl SegmentFlow {
    pub fn friction_warning(&self) -> Option<FrictionWarning> {
        self.friction.and_then(|f| f.warning)
    }

    pub fn mass_flow(&self) -> MassRate {
        kgps(self.basis_density.value * self.flow.value)
    }
}

/// Compute the flow a segment carries between its boundary pressures.
pub fn compute_segment_flow(
    segment: &Segment,
    fluid: &FluidState,
    settings: &FlowSettings,
) -> ComponentResult<SegmentFlow> {
    segment.validate()?;
    check_positive(fluid.density().value, "fluid density")?;
    check_positive(fluid.viscosity().value, "fluid viscosity")?;

    let equation = select_flow_equation(
        fluid.phase,
        segment.flow_type,
        segment.length,
        segment.diameter,
    );

    // validate() has already rejected a negative drop
    let dp = segment.pressure_drop().value;
    let level = segment.elevation_change.value == 0.0;
    if dp <= EPSILON_PRESSURE && (level || !equation.is_gas_correlation()) {
        return Ok(SegmentFlow {
            equation,
            flow: m3ps(0.0),
            velocity: mps(0.0),
            reynolds: 0.0,
            friction: None,
            basis_density: flow_basis_density(equation, fluid),
        });
    }

    let result = match equation.gas_correlation() {
        None => darcy_weisbach(segment, fluid, settings, dp)?,
        Some(correlation) => {
            let inputs = gas_inputs(segment, fluid);
            let q_scfd = correlation.flow_scf_per_day(&inputs)?;
            check_finite(q_scfd, "gas flow rate")?;
            let flow = field::scf_per_day(q_scfd);
            let velocity = operating_velocity(segment, fluid, flow);
            SegmentFlow {
                equation,
                flow,
                velocity,
                reynolds: reynolds(fluid, velocity.value, segment.diameter.value),
                friction: None,
                basis_density: flow_basis_density(equation, fluid),
            }
        }
    };

    tracing::trace!(
        segment = %segment.name,
        equation = %result.equation,
        flow_m3s = result.flow.value,
        reynolds = result.reynolds,
        "segment flow"
    );
    Ok(result)
}

/// Pressure drop the segment needs to carry `flow` from its upstream
/// pressure. The segment's downstream pressure is ignored; `flow` is on the
/// same basis [`compute_segment_flow`] reports for the selected equation.
pub fn pressure_drop_for_flow(
    segment: &Segment,
    fluid: &FluidState,
    flow: VolumeRate,
    settings: &FlowSettings,
) -> ComponentResult<Pressure> {
    check_finite(flow.value, "flow rate")?;
    if flow.value < 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "flow rate must be non-negative",
        });
    }
    check_positive(fluid.density().value, "fluid density")?;
    check_positive(fluid.viscosity().value, "fluid viscosity")?;

    let equation = select_flow_equation(
        fluid.phase,
        segment.flow_type,
        segment.length,
        segment.diameter,
    );

    match equation.gas_correlation() {
        Some(correlation) => {
            let inputs = gas_inputs(segment, fluid);
            let p2 = correlation.downstream_pressure_for_flow(&inputs, to_scf_per_day(flow))?;
            Ok(segment.upstream_pressure - field::psi(p2))
        }
        None => {
            if flow.value == 0.0 {
                return Ok(pa(0.0));
            }
            let d = segment.diameter.value;
            let re = reynolds(fluid, flow.value / segment.area().value, d);
            let f = friction_factor(re, segment.relative_roughness(), &settings.friction)?;
            let dp = darcy_weisbach_pressure_drop(
                flow.value,
                d,
                f.factor,
                segment.length.value,
                fluid.density().value / WATER_DENSITY_KG_M3,
            );
            check_finite(dp, "Darcy-Weisbach pressure drop")?;
            Ok(pa(dp))
        }
    }
}

fn gas_inputs(segment: &Segment, fluid: &FluidState) -> GasFlowInputs {
    GasFlowInputs {
        upstream_psia: to_psi(segment.upstream_pressure),
        downstream_psia: to_psi(segment.downstream_pressure),
        specific_gravity: fluid.specific_gravity(),
        length_miles: to_miles(segment.length),
        elevation_change_ft: to_ft(segment.elevation_change),
        temperature_r: to_rankine(fluid.temperature),
        compressibility: fluid.compressibility(),
        diameter_in: to_inches(segment.diameter),
        efficiency: segment.efficiency,
    }
}

/// Operating volume per base-condition volume for gas sampled at `fluid`.
fn expansion_ratio(fluid: &FluidState) -> f64 {
    let base_pressure = BASE_PRESSURE_PSIA * PA_PER_PSI;
    let base_temperature = BASE_TEMPERATURE_R / 1.8;
    (base_pressure / fluid.pressure.value)
        * (fluid.temperature.value / base_temperature)
        * fluid.compressibility()
}

fn operating_velocity(segment: &Segment, fluid: &FluidState, standard: VolumeRate) -> Velocity {
    mps(standard.value * expansion_ratio(fluid) / segment.area().value)
}

/// Density matching the flow basis of `equation`, so that `ρ·Q` is a mass
/// flow whichever correlation produced `Q`.
pub fn flow_basis_density(equation: FlowEquation, fluid: &FluidState) -> Density {
    if equation.is_gas_correlation() {
        fluid.density() * expansion_ratio(fluid)
    } else {
        fluid.density()
    }
}

fn reynolds(fluid: &FluidState, velocity: f64, diameter: f64) -> f64 {
    fluid.density().value * velocity * diameter / fluid.viscosity().value
}

/// Darcy-Weisbach with the friction factor resolved against the flow it
/// produces: f → Q → Re → f until f settles.
fn darcy_weisbach(
    segment: &Segment,
    fluid: &FluidState,
    settings: &FlowSettings,
    dp: f64,
) -> ComponentResult<SegmentFlow> {
    let d = segment.diameter.value;
    let l = segment.length.value;
    let area = segment.area().value;
    let rr = segment.relative_roughness();
    // Density ratio to water, also for gases forced down this path
    let sg = fluid.density().value / WATER_DENSITY_KG_M3;

    let flow_for = |f: f64| -> ComponentResult<(f64, f64)> {
        let q = darcy_weisbach_flow(dp, d, f, l, sg);
        check_finite(q, "Darcy-Weisbach flow rate")?;
        Ok((q, reynolds(fluid, q / area, d)))
    };

    let mut factor = settings.initial_friction_factor;
    check_positive(factor, "initial friction factor")?;
    let mut estimate = None;
    let mut converged = false;
    let mut iterations = 0;

    for _ in 0..settings.max_outer_iterations {
        iterations += 1;
        let (_, re) = flow_for(factor)?;
        let next = friction_factor(re, rr, &settings.friction)?;
        let settled = (next.factor - factor).abs() <= settings.outer_rel_tol * factor;
        factor = next.factor;
        estimate = Some(next);
        if settled {
            converged = true;
            break;
        }
    }

    let (q, re) = flow_for(factor)?;
    let mut estimate = match estimate {
        Some(e) => e,
        None => friction_factor(re, rr, &settings.friction)?,
    };
    if !converged && estimate.warning.is_none() {
        tracing::debug!(segment = %segment.name, iterations, "Darcy-Weisbach friction loop hit cap");
        estimate.warning = Some(FrictionWarning::ConvergenceCap {
            reynolds: re,
            iterations,
        });
    }

    Ok(SegmentFlow {
        equation: FlowEquation::DarcyWeisbach,
        flow: m3ps(q),
        velocity: mps(q / area),
        reynolds: re,
        friction: Some(estimate),
        basis_density: fluid.density(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlations::{PANHANDLE_A, WEYMOUTH};
    use crate::equation::FlowType;
    use crate::friction::FlowRegime;
    use pf_core::units::field::{fahrenheit, inches, miles, psi, to_ft3ps};
    use pf_core::units::{k, m};
    use pf_fluids::{ConstantPropertyModel, FluidModel, IdealGasModel, Phase, Species};

    fn methane_state(segment: &Segment) -> FluidState {
        IdealGasModel::new()
            .with_compressibility(0.998)
            .state(Species::CH4, Phase::Gas, segment.mean_pressure(), fahrenheit(60.0))
            .unwrap()
    }

    fn water_state(p: f64) -> FluidState {
        ConstantPropertyModel::water()
            .state(Species::H2O, Phase::Liquid, pa(p), k(288.15))
            .unwrap()
    }

    fn gas_segment(length_mi: f64) -> Segment {
        Segment::new("G", miles(length_mi), inches(12.0), psi(100.0), psi(98.0))
            .with_efficiency(0.95)
            .with_ambient_pressure(psi(14.7))
    }

    #[test]
    fn twenty_mile_gas_line_uses_weymouth() {
        let seg = gas_segment(20.0);
        let fluid = methane_state(&seg);
        let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
        assert_eq!(out.equation, FlowEquation::Weymouth);
        assert!(out.friction.is_none());

        let q = to_scf_per_day(out.flow);
        let direct = WEYMOUTH.flow_scf_per_day(&gas_inputs(&seg, &fluid)).unwrap();
        assert!((q - direct).abs() / direct < 1e-12);
    }

    #[test]
    fn long_large_bore_gas_line_uses_panhandle_a() {
        let seg = gas_segment(20.5);
        let fluid = methane_state(&seg);
        let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
        assert_eq!(out.equation, FlowEquation::PanhandleA);

        let direct = PANHANDLE_A.flow_scf_per_day(&gas_inputs(&seg, &fluid)).unwrap();
        assert!((to_scf_per_day(out.flow) - direct).abs() / direct < 1e-12);

        // Tens of standard ft³/s for a 2 psi drop over 20 miles of 12 in pipe
        let ft3s = to_ft3ps(out.flow);
        assert!(ft3s > 1.0 && ft3s < 100.0, "{ft3s} ft³/s");
        assert!(out.reynolds > 4000.0);
    }

    #[test]
    fn gas_inverse_recovers_boundary_drop() {
        let seg = gas_segment(35.0).with_elevation_change(pf_core::units::field::ft(150.0));
        let fluid = methane_state(&seg);
        let settings = FlowSettings::default();
        let out = compute_segment_flow(&seg, &fluid, &settings).unwrap();
        assert_eq!(out.equation, FlowEquation::PanhandleA);

        let dp = pressure_drop_for_flow(&seg, &fluid, out.flow, &settings).unwrap();
        assert!((dp.value - seg.pressure_drop().value).abs() < 1e-6 * seg.pressure_drop().value);
    }

    #[test]
    fn inverse_rejects_negative_flow() {
        let seg = gas_segment(1.0);
        let err = pressure_drop_for_flow(
            &seg,
            &methane_state(&seg),
            m3ps(-1.0),
            &FlowSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ComponentError::InvalidArg { .. }));
    }

    #[test]
    fn gas_basis_density_is_standard_density() {
        let seg = gas_segment(20.0);
        let fluid = methane_state(&seg);
        let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
        // Methane at 14.7 psia and 520 °R is about 0.68 kg/m³
        let rho = out.basis_density.value;
        assert!(rho > 0.6 && rho < 0.75, "{rho}");
        assert!((out.mass_flow().value - rho * out.flow.value).abs() < 1e-12);
    }

    #[test]
    fn zero_drop_zero_flow() {
        let seg = Segment::new("Z", miles(1.0), inches(6.0), psi(50.0), psi(50.0))
            .with_ambient_pressure(psi(14.7));
        let out = compute_segment_flow(&seg, &methane_state(&seg), &FlowSettings::default())
            .unwrap();
        assert_eq!(out.flow.value, 0.0);
    }

    #[test]
    fn negative_drop_is_error() {
        let seg = Segment::new("N", miles(1.0), inches(6.0), psi(50.0), psi(60.0))
            .with_ambient_pressure(psi(14.7));
        let fluid = methane_state(&gas_segment(1.0));
        let err = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap_err();
        assert!(matches!(err, ComponentError::Configuration { .. }));
    }

    #[test]
    fn water_line_turbulent_darcy_weisbach() {
        let seg = Segment::new("W", m(1000.0), m(0.2), pa(600_000.0), pa(500_000.0))
            .with_roughness(m(4.5e-5))
            .with_flow_type(FlowType::Incompressible)
            .with_ambient_pressure(pa(101_325.0));
        let fluid = water_state(550_000.0);
        let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
        assert_eq!(out.equation, FlowEquation::DarcyWeisbach);

        let friction = out.friction.unwrap();
        assert_eq!(friction.regime, FlowRegime::Turbulent);
        assert!(friction.warning.is_none());

        // The friction factor at the final Re reproduces the boundary drop.
        let dp = pressure_drop_for_flow(&seg, &fluid, out.flow, &FlowSettings::default()).unwrap();
        assert!((dp.value - 100_000.0).abs() / 100_000.0 < 1e-4, "dp = {}", dp.value);
        assert!(out.velocity.value > 1.0 && out.velocity.value < 10.0);
    }

    #[test]
    fn viscous_oil_is_laminar() {
        let oil = ConstantPropertyModel::new(
            pf_core::units::kg_per_m3(900.0),
            pf_core::units::pa_s(2.0),
        )
        .unwrap()
        .state(Species::H2O, Phase::Liquid, pa(200_000.0), k(300.0))
        .unwrap();
        let seg = Segment::new("O", m(500.0), m(0.1), pa(250_000.0), pa(150_000.0))
            .with_ambient_pressure(pa(101_325.0));
        let out = compute_segment_flow(&seg, &oil, &FlowSettings::default()).unwrap();
        let friction = out.friction.unwrap();
        assert_eq!(friction.regime, FlowRegime::Laminar);
        assert!((friction.factor - 64.0 / out.reynolds).abs() / friction.factor < 1e-4);

        // Hagen-Poiseuille: Q = π·D⁴·ΔP / (128·μ·L)
        let hp = std::f64::consts::PI * 0.1f64.powi(4) * 100_000.0 / (128.0 * 2.0 * 500.0);
        assert!((out.flow.value - hp).abs() / hp < 1e-4);
    }

    #[test]
    fn outer_cap_attaches_warning() {
        let seg = Segment::new("W", m(1000.0), m(0.2), pa(600_000.0), pa(500_000.0))
            .with_roughness(m(4.5e-5))
            .with_ambient_pressure(pa(101_325.0));
        let settings = FlowSettings {
            max_outer_iterations: 1,
            outer_rel_tol: 0.0,
            ..FlowSettings::default()
        };
        let out = compute_segment_flow(&seg, &water_state(550_000.0), &settings).unwrap();
        assert!(matches!(
            out.friction_warning(),
            Some(FrictionWarning::ConvergenceCap { iterations: 1, .. })
        ));
    }
}
