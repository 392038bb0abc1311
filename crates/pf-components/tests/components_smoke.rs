//! Integration tests for pf-components with real fluid models.

use pf_components::{
    FlowEquation, FlowSettings, Leak, LeakSeverity, Segment, compute_segment_flow, evaluate_leaks,
};
use pf_core::units::field::{fahrenheit, inches, miles, psi, to_ft3ps};
use pf_core::units::{Density, Pressure, k, m, pa};
use pf_fluids::{CoolPropModel, FluidError, FluidModel, Phase, Species};

#[allow(dead_code)]
#[derive(Debug)]
enum SmokeError {
    Component(pf_components::ComponentError),
    Fluid(FluidError),
}

impl From<pf_components::ComponentError> for SmokeError {
    fn from(e: pf_components::ComponentError) -> Self {
        SmokeError::Component(e)
    }
}

fn methane_line(length_mi: f64) -> Segment {
    Segment::new("A", miles(length_mi), inches(12.0), psi(100.0), psi(98.0))
        .with_efficiency(0.95)
        .with_ambient_pressure(psi(14.7))
        .with_leak(Leak::new(0.5, m(0.010)).with_name("L1"))
}

#[test]
fn methane_twenty_miles_weymouth() {
    let model = CoolPropModel::new();
    let seg = methane_line(20.0);
    let fluid = model
        .state(Species::CH4, Phase::Gas, seg.mean_pressure(), fahrenheit(60.0))
        .unwrap();

    let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
    assert_eq!(out.equation, FlowEquation::Weymouth);

    let ft3s = to_ft3ps(out.flow);
    assert!(ft3s > 10.0 && ft3s < 100.0, "Weymouth flow {ft3s} ft³/s");
    assert!(out.reynolds > 1e5, "gas line should be well turbulent");
}

#[test]
fn methane_just_over_twenty_miles_panhandle_a() {
    let model = CoolPropModel::new();
    let seg = methane_line(20.5);
    let fluid = model
        .state(Species::CH4, Phase::Gas, seg.mean_pressure(), fahrenheit(60.0))
        .unwrap();

    let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
    assert_eq!(out.equation, FlowEquation::PanhandleA);
    assert!(to_ft3ps(out.flow).is_finite());
}

#[test]
fn methane_leak_at_midpoint() {
    let model = CoolPropModel::new();
    let seg = methane_line(20.0);

    let summary = evaluate_leaks(
        &seg.leaks,
        seg.upstream_pressure,
        seg.downstream_pressure,
        seg.ambient_pressure,
        |p: Pressure| -> Result<Density, SmokeError> {
            model
                .state(Species::CH4, Phase::Gas, p, fahrenheit(60.0))
                .map(|s| s.density())
                .map_err(SmokeError::Fluid)
        },
    )
    .unwrap();

    let leak = &summary.leaks[0];
    assert!((leak.local_pressure.value - psi(99.0).value).abs() < 1e-6);
    let rho = leak.density.unwrap().value;
    assert!(rho > 4.0 && rho < 5.0, "methane at 99 psi: {rho} kg/m³");

    // 10 mm hole, ~84 psi above ambient
    let ft3s = to_ft3ps(summary.total);
    assert!((ft3s - 0.84).abs() < 0.03, "leak flow {ft3s} ft³/s");
    assert_eq!(leak.severity, LeakSeverity::Large);
}

#[test]
fn water_main_darcy_weisbach() {
    let model = CoolPropModel::new();
    let seg = Segment::new("W", m(2000.0), m(0.3), pa(800_000.0), pa(600_000.0))
        .with_roughness(m(4.5e-5));
    let fluid = model
        .state(Species::H2O, Phase::Liquid, seg.mean_pressure(), k(293.15))
        .unwrap();

    let out = compute_segment_flow(&seg, &fluid, &FlowSettings::default()).unwrap();
    assert_eq!(out.equation, FlowEquation::DarcyWeisbach);
    let friction = out.friction.unwrap();
    assert!(friction.factor > 0.008 && friction.factor < 0.03);
    assert!(friction.warning.is_none());
}
