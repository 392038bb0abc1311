//! Normalize a validated configuration to SI and build the solver snapshot.

use crate::schema::{
    FlowTypeDef, LeakDef, PhaseDef, PipelineDef, SegmentDef, SolverDef, UnitValueDef,
    ValvePositionDef, ValveStateDef,
};
use crate::validate::{leak_diameter, to_si, validate_pipeline};
use crate::{ProjectError, ProjectResult};
use pf_components::{
    FlowSettings, FlowType, FrictionSettings, Leak, Segment, Valve, ValvePosition, ValveState,
};
use pf_core::QuantityKind;
use pf_core::numeric::Tolerances;
use pf_core::units::{k, m, pa};
use pf_fluids::{Phase, Species};
use pf_solver::{FluidSpec, Pipeline, SolverSettings};

impl From<PhaseDef> for Phase {
    fn from(p: PhaseDef) -> Self {
        match p {
            PhaseDef::Liquid => Phase::Liquid,
            PhaseDef::Gas => Phase::Gas,
        }
    }
}

impl From<FlowTypeDef> for FlowType {
    fn from(f: FlowTypeDef) -> Self {
        match f {
            FlowTypeDef::Compressible => FlowType::Compressible,
            FlowTypeDef::Incompressible => FlowType::Incompressible,
        }
    }
}

impl From<ValvePositionDef> for ValvePosition {
    fn from(p: ValvePositionDef) -> Self {
        match p {
            ValvePositionDef::Start => ValvePosition::Start,
            ValvePositionDef::End => ValvePosition::End,
        }
    }
}

impl From<ValveStateDef> for ValveState {
    fn from(s: ValveStateDef) -> Self {
        match s {
            ValveStateDef::Open => ValveState::Open,
            ValveStateDef::Closed => ValveState::Closed,
        }
    }
}

impl From<&SolverDef> for SolverSettings {
    fn from(def: &SolverDef) -> Self {
        SolverSettings {
            flow: FlowSettings {
                friction: FrictionSettings {
                    rel_tol: def.friction_tolerance,
                    max_iterations: def.max_friction_iterations,
                },
                initial_friction_factor: def.initial_friction_factor,
                max_outer_iterations: def.max_outer_iterations,
                ..FlowSettings::default()
            },
            balance_tolerance: Tolerances::relative(def.balance_tolerance),
            mass_balance_threshold: def.mass_balance_threshold,
        }
    }
}

/// Validate `def` and turn it into the solver's immutable snapshot plus the
/// settings it asks for.
pub fn compile_pipeline(def: &PipelineDef) -> ProjectResult<(Pipeline, SolverSettings)> {
    validate_pipeline(def)?;

    let species: Species = def
        .fluid
        .species
        .parse()
        .map_err(|_| ProjectError::Compile(format!("unknown species {}", def.fluid.species)))?;
    let temperature = to_si(
        "fluid.temperature",
        &def.fluid.temperature,
        QuantityKind::Temperature,
    )?;
    let mut fluid = FluidSpec::new(species, def.fluid.phase.into(), k(temperature));
    if let Some(mw) = def.fluid.molecular_weight {
        fluid = fluid.with_molecular_weight(mw);
    }

    let ambient = match &def.ambient_pressure {
        Some(p) => Some(to_si("ambient_pressure", p, QuantityKind::Pressure)?),
        None => None,
    };

    let mut pipeline = Pipeline::new(def.name.clone(), fluid);
    for segment in &def.segments {
        pipeline
            .segments
            .push(compile_segment(segment, def.flow_type, ambient)?);
    }

    let settings = def
        .solver
        .as_ref()
        .map(SolverSettings::from)
        .unwrap_or_default();
    settings
        .validate()
        .map_err(|e| ProjectError::Compile(e.to_string()))?;

    Ok((pipeline, settings))
}

fn compile_segment(
    def: &SegmentDef,
    default_flow_type: FlowTypeDef,
    default_ambient: Option<f64>,
) -> ProjectResult<Segment> {
    let field = |name: &str| format!("segments[{}].{name}", def.name);
    let length = |name: &str, v: &UnitValueDef| to_si(&field(name), v, QuantityKind::Length);
    let pressure = |name: &str, v: &UnitValueDef| to_si(&field(name), v, QuantityKind::Pressure);

    let mut segment = Segment::new(
        def.name.clone(),
        m(length("length", &def.length)?),
        m(length("diameter", &def.diameter)?),
        pa(pressure("upstream_pressure", &def.upstream_pressure)?),
        pa(pressure("downstream_pressure", &def.downstream_pressure)?),
    )
    .with_material(def.material.clone())
    .with_efficiency(def.efficiency)
    .with_flow_type(def.flow_type.unwrap_or(default_flow_type).into());

    if let Some(r) = &def.roughness {
        segment = segment.with_roughness(m(length("roughness", r)?));
    }
    if let Some(e) = &def.elevation_change {
        segment = segment.with_elevation_change(m(length("elevation_change", e)?));
    }
    match (&def.ambient_pressure, default_ambient) {
        (Some(p), _) => segment = segment.with_ambient_pressure(pa(pressure("ambient_pressure", p)?)),
        (None, Some(p)) => segment = segment.with_ambient_pressure(pa(p)),
        (None, None) => {}
    }
    if let Some(t) = &def.temperature {
        let t = to_si(&field("temperature"), t, QuantityKind::Temperature)?;
        segment = segment.with_temperature(k(t));
    }

    for (i, leak) in def.leaks.iter().enumerate() {
        segment = segment.with_leak(compile_leak(leak, &format!("{}[{i}]", field("leaks")))?);
    }
    for valve in &def.valves {
        let mut v = Valve::new(valve.state.into());
        if let Some(name) = &valve.name {
            v = v.with_name(name.clone());
        }
        segment = segment.with_valve(valve.position.into(), v);
    }

    Ok(segment)
}

fn compile_leak(def: &LeakDef, field: &str) -> ProjectResult<Leak> {
    let mut leak = Leak::new(def.location, m(leak_diameter(def, field)?))
        .with_discharge_coefficient(def.discharge_coefficient)
        .with_active(def.active);
    if let Some(name) = &def.name {
        leak = leak.with_name(name.clone());
    }
    Ok(leak)
}
