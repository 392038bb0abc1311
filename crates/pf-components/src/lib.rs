//! pf-components: per-segment physics for pipeline flow.
//!
//! Provides:
//! - Correlation selection (Darcy-Weisbach, Weymouth, Panhandle A/B)
//! - Darcy friction factor across laminar, transitional and turbulent flow
//! - Segment flow at given boundary pressures
//! - Orifice leaks and their severity
//! - Start/end valves and the gate state they impose on a chain
//!
//! Everything here is a pure function of a segment and a sampled
//! [`pf_fluids::FluidState`]; chaining segments together is pf-solver's job.
//!
//! # Example
//!
//! ```no_run
//! use pf_components::{FlowSettings, Segment, compute_segment_flow};
//! use pf_core::units::field::{fahrenheit, inches, miles, psi, to_ft3ps};
//! use pf_fluids::{CoolPropModel, FluidModel, Phase, Species};
//!
//! let segment = Segment::new("A", miles(20.0), inches(12.0), psi(100.0), psi(98.0))
//!     .with_efficiency(0.95);
//! let fluid = CoolPropModel::new()
//!     .state(Species::CH4, Phase::Gas, segment.mean_pressure(), fahrenheit(60.0))
//!     .unwrap();
//!
//! let flow = compute_segment_flow(&segment, &fluid, &FlowSettings::default()).unwrap();
//! println!("{}: {:.2} ft³/s", flow.equation, to_ft3ps(flow.flow));
//! ```

pub mod common;
pub mod correlations;
pub mod equation;
pub mod error;
pub mod flow;
pub mod friction;
pub mod leak;
pub mod segment;
pub mod valve;

// Re-exports
pub use correlations::{GasCorrelation, GasFlowInputs, PANHANDLE_A, PANHANDLE_B, WEYMOUTH};
pub use equation::{FlowEquation, FlowType, select_flow_equation};
pub use error::{ComponentError, ComponentResult};
pub use flow::{
    FlowSettings, SegmentFlow, compute_segment_flow, flow_basis_density, pressure_drop_for_flow,
};
pub use friction::{FlowRegime, FrictionEstimate, FrictionSettings, FrictionWarning, friction_factor};
pub use leak::{Leak, LeakFlow, LeakSeverity, LeakSummary, blocked_leaks, evaluate_leaks};
pub use segment::Segment;
pub use valve::{GateState, Valve, ValvePosition, ValveState, gate_state};
