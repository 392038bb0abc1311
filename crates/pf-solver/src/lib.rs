//! Steady-state pipeline chain solver.
//!
//! Walks an ordered chain of segments once, left to right. Each segment's
//! gate state is derived from its valves and the segment before it; flowing
//! segments get a correlation flow and leak evaluation, blocked segments are
//! zeroed with their pressure held. The outcome is a [`PipelineResult`] with
//! per-segment detail, pipeline aggregates, balance residuals and any
//! non-fatal warnings.
//!
//! Fluid properties come from an injected [`pf_fluids::FluidModel`], sampled
//! fresh at every segment's mean pressure and every leak's local pressure.

pub mod error;
pub mod pipeline;
pub mod result;
pub mod settings;
pub mod solve;

pub use error::{SegmentError, SolverError, SolverResult};
pub use pipeline::{FluidSpec, Pipeline};
pub use result::{BalanceBasis, PipelineResult, SegmentResult, SolveWarning};
pub use settings::SolverSettings;
pub use solve::{solve, solve_many};
