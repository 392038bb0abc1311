//! Left-to-right chain solve.
//!
//! The chain is a fold over the ordered segments carrying a small
//! [`ChainState`]: the pressure and flow handed to the next segment and the
//! gate it inherits. Each step is a transition
//! `(previous state, segment) -> (next state, segment result)`; a failing
//! step aborts the fold and names the segment.

use crate::error::{SegmentError, SolverError, SolverResult};
use crate::pipeline::Pipeline;
use crate::result::{BalanceBasis, PipelineResult, SegmentResult, SolveWarning};
use crate::settings::SolverSettings;
use pf_components::{
    FrictionWarning, GateState, Segment, blocked_leaks, compute_segment_flow, evaluate_leaks,
    gate_state, select_flow_equation,
};
use pf_core::numeric::relative_residual;
use pf_core::units::{Density, Pressure, Temperature, VolumeRate, kgps, m3ps, mps};
use pf_fluids::{FluidModel, FluidState};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChainState {
    /// Downstream pressure of the previous segment; `None` before the first
    pressure: Option<Pressure>,
    /// Outlet flow of the previous segment; `None` before the first
    flow: Option<VolumeRate>,
    /// Volume basis `flow` is measured on; `None` until a segment has flowed
    basis: Option<FlowBasis>,
    gate: GateState,
    /// Segment that stopped the flow, once anything has
    blocked_by: Option<usize>,
}

impl ChainState {
    fn inlet() -> Self {
        Self {
            pressure: None,
            flow: None,
            basis: None,
            gate: GateState::Flowing,
            blocked_by: None,
        }
    }
}

/// Volume basis of a carried flow: standard conditions for the gas
/// correlations, operating conditions for Darcy-Weisbach.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FlowBasis {
    standard: bool,
    density: Density,
}

impl FlowBasis {
    /// Re-express `flow` on `to` so that `ρ·Q` is unchanged. Flows already on
    /// the same kind of basis are carried as they are.
    fn convert(self, flow: VolumeRate, to: FlowBasis) -> VolumeRate {
        if self.standard == to.standard {
            return flow;
        }
        m3ps(flow.value * (self.density.value / to.density.value))
    }
}

struct Step {
    next: ChainState,
    result: SegmentResult,
    warnings: Vec<SolveWarning>,
}

struct Context<'a> {
    pipeline: &'a Pipeline,
    model: &'a dyn FluidModel,
    settings: &'a SolverSettings,
}

impl Context<'_> {
    fn sample(&self, pressure: Pressure, temperature: Temperature) -> Result<FluidState, SegmentError> {
        self.pipeline
            .fluid
            .sample(self.model, pressure, temperature)
            .map_err(|source| SegmentError::PropertyLookup {
                pressure_pa: pressure.value,
                temperature_k: temperature.value,
                source,
            })
    }

    fn step(&self, state: ChainState, index: usize, segment: &Segment) -> Result<Step, SegmentError> {
        let gate = gate_state(
            state.gate,
            segment.start_valve.as_ref(),
            segment.end_valve.as_ref(),
        );
        tracing::debug!(index, segment = %segment.name, %gate, "gate");

        match gate {
            GateState::BlockedAtStart => self.blocked_step(state, index, segment),
            GateState::Flowing | GateState::BlockedAtEnd => {
                self.flowing_step(state, index, segment, gate)
            }
        }
    }

    /// No flow enters: zero everything and hold the pressure.
    fn blocked_step(
        &self,
        state: ChainState,
        index: usize,
        segment: &Segment,
    ) -> Result<Step, SegmentError> {
        segment.validate()?;
        let held = state.pressure.unwrap_or(segment.upstream_pressure);
        let fluid = &self.pipeline.fluid;
        let zero = m3ps(0.0);

        let result = SegmentResult {
            index,
            name: segment.name.clone(),
            gate: GateState::BlockedAtStart,
            blocked_by: state.blocked_by,
            equation: select_flow_equation(
                fluid.phase,
                segment.flow_type,
                segment.length,
                segment.diameter,
            ),
            upstream_pressure: held,
            downstream_pressure: held,
            capacity_flow: zero,
            inlet_flow: zero,
            outlet_flow: zero,
            leak_flow: zero,
            leaks: blocked_leaks(&segment.leaks, held).leaks,
            friction_factor: None,
            regime: None,
            reynolds: 0.0,
            velocity: mps(0.0),
            density: None,
            inlet_mass_flow: kgps(0.0),
            outlet_mass_flow: kgps(0.0),
            leak_mass_flow: kgps(0.0),
        };

        Ok(Step {
            next: ChainState {
                pressure: Some(held),
                flow: Some(zero),
                basis: state.basis,
                gate: GateState::BlockedAtStart,
                blocked_by: state.blocked_by.or(Some(index)),
            },
            result,
            warnings: Vec::new(),
        })
    }

    fn flowing_step(
        &self,
        state: ChainState,
        index: usize,
        segment: &Segment,
        gate: GateState,
    ) -> Result<Step, SegmentError> {
        let mut effective = segment.clone();
        if let Some(carried) = state.pressure {
            effective.upstream_pressure = carried;
        }
        effective.validate()?;

        let temperature = self.pipeline.segment_temperature(segment);
        let fluid = self.sample(effective.mean_pressure(), temperature)?;
        let flow = compute_segment_flow(&effective, &fluid, &self.settings.flow)?;

        let mut warnings = Vec::new();
        match flow.friction_warning() {
            Some(FrictionWarning::ConvergenceCap {
                reynolds,
                iterations,
            }) => {
                tracing::warn!(index, reynolds, iterations, "friction factor did not converge");
                warnings.push(SolveWarning::FrictionConvergence {
                    index,
                    reynolds,
                    iterations,
                });
            }
            Some(FrictionWarning::BlasiusOutOfRange { reynolds }) => {
                tracing::warn!(index, reynolds, "Blasius beyond validated range");
                warnings.push(SolveWarning::BlasiusOutOfRange { index, reynolds });
            }
            None => {}
        }

        let basis = FlowBasis {
            standard: flow.equation.is_gas_correlation(),
            density: flow.basis_density,
        };
        let inlet = match (state.flow, state.basis) {
            (Some(carried), Some(from)) => from.convert(carried, basis),
            (Some(carried), None) => carried,
            (None, _) => flow.flow,
        };
        let leaks = evaluate_leaks(
            &effective.leaks,
            effective.upstream_pressure,
            effective.downstream_pressure,
            effective.ambient_pressure,
            |p| -> Result<Density, SegmentError> { Ok(self.sample(p, temperature)?.density()) },
        )?;

        let mut outlet = inlet - leaks.total;
        if outlet.value < 0.0 {
            tracing::warn!(
                index,
                inlet_m3s = inlet.value,
                leak_m3s = leaks.total.value,
                "leaks exceed segment inlet flow"
            );
            warnings.push(SolveWarning::LeaksExceedFlow {
                index,
                inlet_m3s: inlet.value,
                leak_m3s: leaks.total.value,
            });
            outlet = m3ps(0.0);
        }

        let blocked_by = if gate == GateState::BlockedAtEnd {
            outlet = m3ps(0.0);
            Some(index)
        } else {
            state.blocked_by
        };

        tracing::debug!(
            index,
            segment = %segment.name,
            equation = %flow.equation,
            inlet_m3s = inlet.value,
            outlet_m3s = outlet.value,
            leak_m3s = leaks.total.value,
            "segment solved"
        );

        let rho = flow.basis_density.value;
        // Carried inlet flow moves at the capacity velocity scaled by flow
        let velocity = if flow.flow.value > 0.0 {
            flow.velocity * (inlet.value / flow.flow.value)
        } else {
            mps(0.0)
        };
        let result = SegmentResult {
            index,
            name: segment.name.clone(),
            gate,
            blocked_by: None,
            equation: flow.equation,
            upstream_pressure: effective.upstream_pressure,
            downstream_pressure: effective.downstream_pressure,
            capacity_flow: flow.flow,
            inlet_flow: inlet,
            outlet_flow: outlet,
            leak_flow: leaks.total,
            friction_factor: flow.friction.map(|f| f.factor),
            regime: flow.friction.map(|f| f.regime),
            reynolds: flow.reynolds,
            velocity,
            density: Some(flow.basis_density),
            inlet_mass_flow: kgps(rho * inlet.value),
            outlet_mass_flow: kgps(rho * outlet.value),
            leak_mass_flow: leaks.total_mass,
            leaks: leaks.leaks,
        };

        Ok(Step {
            next: ChainState {
                pressure: Some(effective.downstream_pressure),
                flow: Some(outlet),
                basis: Some(basis),
                gate,
                blocked_by,
            },
            result,
            warnings,
        })
    }
}

/// Solve one pipeline in a single left-to-right pass.
pub fn solve(
    pipeline: &Pipeline,
    model: &dyn FluidModel,
    settings: &SolverSettings,
) -> SolverResult<PipelineResult> {
    settings.validate()?;
    if pipeline.segments.is_empty() {
        return Err(SolverError::EmptyPipeline);
    }

    let ctx = Context {
        pipeline,
        model,
        settings,
    };

    let mut state = ChainState::inlet();
    let mut segments = Vec::with_capacity(pipeline.segments.len());
    let mut warnings = Vec::new();

    for (index, segment) in pipeline.segments.iter().enumerate() {
        let step = ctx
            .step(state, index, segment)
            .map_err(|source| {
                tracing::warn!(index, segment = %segment.name, error = %source, "segment failed");
                SolverError::Segment {
                    index,
                    name: segment.name.clone(),
                    source,
                }
            })?;
        state = step.next;
        segments.push(step.result);
        warnings.extend(step.warnings);
    }

    let result = aggregate(pipeline, segments, warnings, settings);
    tracing::debug!(
        pipeline = %pipeline.name,
        inlet_m3s = result.inlet_flow.value,
        outlet_m3s = result.outlet_flow.value,
        leak_m3s = result.total_leak.value,
        "pipeline solved"
    );
    Ok(result)
}

/// Solve independent snapshots in parallel. Results keep input order.
pub fn solve_many(
    pipelines: &[Pipeline],
    model: &dyn FluidModel,
    settings: &SolverSettings,
) -> Vec<SolverResult<PipelineResult>> {
    pipelines
        .par_iter()
        .map(|pipeline| solve(pipeline, model, settings))
        .collect()
}

fn aggregate(
    pipeline: &Pipeline,
    segments: Vec<SegmentResult>,
    mut warnings: Vec<SolveWarning>,
    settings: &SolverSettings,
) -> PipelineResult {
    let zero = m3ps(0.0);
    let inlet_flow = segments.first().map_or(zero, |s| s.inlet_flow);
    let outlet_flow = segments.last().map_or(zero, |s| s.outlet_flow);
    let total_leak = m3ps(segments.iter().map(|s| s.leak_flow.value).sum());
    // Summed per segment so each term stays on one volume basis; on a
    // single-basis chain this telescopes to inlet - outlet - leaks
    let balance_residual = m3ps(
        segments
            .iter()
            .map(|s| s.inlet_flow.value - s.outlet_flow.value - s.leak_flow.value)
            .sum(),
    );

    let inlet_mass_flow = segments.first().map_or(kgps(0.0), |s| s.inlet_mass_flow);
    let outlet_mass_flow = segments.last().map_or(kgps(0.0), |s| s.outlet_mass_flow);
    let total_leak_mass = kgps(segments.iter().map(|s| s.leak_mass_flow.value).sum());
    let mass_balance_residual = inlet_mass_flow - outlet_mass_flow - total_leak_mass;

    let blocked_at = segments.iter().find(|s| s.is_blocked()).map(|s| s.index);

    // Balances only hold for a chain that reaches its outlet
    if blocked_at.is_none() {
        let volumetric = relative_residual(balance_residual.value, inlet_flow.value);
        let tol = settings.balance_tolerance;
        if balance_residual.value.abs() > tol.abs && volumetric > tol.rel {
            tracing::warn!(relative_residual = volumetric, "volumetric balance mismatch");
            warnings.push(SolveWarning::BalanceMismatch {
                basis: BalanceBasis::Volumetric,
                relative_residual: volumetric,
                threshold: tol.rel,
            });
        }

        let mass = relative_residual(mass_balance_residual.value, inlet_mass_flow.value);
        if mass > settings.mass_balance_threshold {
            tracing::warn!(relative_residual = mass, "mass balance mismatch");
            warnings.push(SolveWarning::BalanceMismatch {
                basis: BalanceBasis::Mass,
                relative_residual: mass,
                threshold: settings.mass_balance_threshold,
            });
        }
    }

    PipelineResult {
        name: pipeline.name.clone(),
        segments,
        inlet_flow,
        outlet_flow,
        total_leak,
        balance_residual,
        inlet_mass_flow,
        outlet_mass_flow,
        total_leak_mass,
        mass_balance_residual,
        blocked_at,
        warnings,
    }
}
