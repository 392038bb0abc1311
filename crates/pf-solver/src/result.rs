//! Per-segment and pipeline-level solve output.

use pf_components::{FlowEquation, FlowRegime, GateState, LeakFlow};
use pf_core::numeric::{Tolerances, relative_residual};
use pf_core::units::{Density, MassRate, Pressure, Velocity, VolumeRate};
use std::fmt;

/// One segment's outcome. Built fresh on every solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult {
    pub index: usize,
    pub name: String,
    pub gate: GateState,
    /// Index of the segment whose valve blocked this one, for segments that
    /// inherit a block from upstream
    pub blocked_by: Option<usize>,
    pub equation: FlowEquation,
    /// Effective upstream pressure (carried from the previous segment)
    pub upstream_pressure: Pressure,
    pub downstream_pressure: Pressure,
    /// Flow the segment's own correlation supports between its pressures
    pub capacity_flow: VolumeRate,
    pub inlet_flow: VolumeRate,
    pub outlet_flow: VolumeRate,
    pub leak_flow: VolumeRate,
    pub leaks: Vec<LeakFlow>,
    pub friction_factor: Option<f64>,
    pub regime: Option<FlowRegime>,
    pub reynolds: f64,
    pub velocity: Velocity,
    /// Density on the basis of the reported flows; `None` when blocked
    pub density: Option<Density>,
    pub inlet_mass_flow: MassRate,
    pub outlet_mass_flow: MassRate,
    pub leak_mass_flow: MassRate,
}

impl SegmentResult {
    pub fn is_blocked(&self) -> bool {
        !self.gate.passes_downstream()
    }

    pub fn pressure_drop(&self) -> Pressure {
        self.upstream_pressure - self.downstream_pressure
    }

    /// Linear pressure estimate at a fractional location along the segment.
    pub fn pressure_at(&self, location: f64) -> Pressure {
        let x = location.clamp(0.0, 1.0);
        self.upstream_pressure - self.pressure_drop() * x
    }
}

/// Which balance a mismatch warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceBasis {
    Volumetric,
    Mass,
}

impl fmt::Display for BalanceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceBasis::Volumetric => write!(f, "volumetric"),
            BalanceBasis::Mass => write!(f, "mass"),
        }
    }
}

/// Non-fatal conditions collected during a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveWarning {
    FrictionConvergence {
        index: usize,
        reynolds: f64,
        iterations: usize,
    },
    BlasiusOutOfRange {
        index: usize,
        reynolds: f64,
    },
    /// Active leaks on a segment discharge more than it receives
    LeaksExceedFlow {
        index: usize,
        inlet_m3s: f64,
        leak_m3s: f64,
    },
    BalanceMismatch {
        basis: BalanceBasis,
        relative_residual: f64,
        threshold: f64,
    },
}

impl SolveWarning {
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            SolveWarning::FrictionConvergence { index, .. }
            | SolveWarning::BlasiusOutOfRange { index, .. }
            | SolveWarning::LeaksExceedFlow { index, .. } => Some(*index),
            SolveWarning::BalanceMismatch { .. } => None,
        }
    }
}

impl fmt::Display for SolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveWarning::FrictionConvergence {
                index,
                reynolds,
                iterations,
            } => write!(
                f,
                "segment {index}: friction factor not converged after {iterations} iterations (Re={reynolds:.0})"
            ),
            SolveWarning::BlasiusOutOfRange { index, reynolds } => write!(
                f,
                "segment {index}: Blasius used at Re={reynolds:.0}, beyond its validated range"
            ),
            SolveWarning::LeaksExceedFlow {
                index,
                inlet_m3s,
                leak_m3s,
            } => write!(
                f,
                "segment {index}: leaks discharge {leak_m3s:.4} m³/s but only {inlet_m3s:.4} m³/s enters; outlet clamped to zero"
            ),
            SolveWarning::BalanceMismatch {
                basis,
                relative_residual,
                threshold,
            } => write!(
                f,
                "{basis} balance residual {relative_residual:.3e} exceeds {threshold:.1e}"
            ),
        }
    }
}

/// Aggregate outcome of one pipeline solve.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub name: String,
    pub segments: Vec<SegmentResult>,
    /// First segment's inlet flow
    pub inlet_flow: VolumeRate,
    /// Last segment's outlet flow; zero when blocked anywhere upstream
    pub outlet_flow: VolumeRate,
    pub total_leak: VolumeRate,
    /// `inlet − outlet − total_leak`
    pub balance_residual: VolumeRate,
    pub inlet_mass_flow: MassRate,
    pub outlet_mass_flow: MassRate,
    pub total_leak_mass: MassRate,
    /// `inlet − outlet − leaks` on a mass basis
    pub mass_balance_residual: MassRate,
    /// First segment whose gate stops flow from reaching the outlet
    pub blocked_at: Option<usize>,
    pub warnings: Vec<SolveWarning>,
}

impl PipelineResult {
    pub fn is_blocked(&self) -> bool {
        self.blocked_at.is_some()
    }

    /// Volumetric balance relative to the inlet flow.
    pub fn relative_balance_residual(&self) -> f64 {
        relative_residual(self.balance_residual.value, self.inlet_flow.value)
    }

    pub fn relative_mass_balance_residual(&self) -> f64 {
        relative_residual(self.mass_balance_residual.value, self.inlet_mass_flow.value)
    }

    /// Whether `inlet − outlet − leaks ≈ 0` within `tol`. Only meaningful for
    /// an unblocked chain: a closed end valve traps the segment's inlet flow.
    pub fn is_balanced(&self, tol: Tolerances) -> bool {
        let residual = self.balance_residual.value.abs();
        residual <= tol.abs || residual <= tol.rel * self.inlet_flow.value.abs()
    }

    pub fn segment(&self, name: &str) -> Option<&SegmentResult> {
        self.segments.iter().find(|s| s.name == name)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
