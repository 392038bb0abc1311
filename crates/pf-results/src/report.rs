//! Conversion from solver output into a persisted report.

use pf_components::LeakFlow;
use pf_core::units::field;
use pf_core::units::{Pressure, VolumeRate};
use pf_project::schema::PipelineDef;
use pf_solver::{PipelineResult, SegmentResult};

use crate::hash::config_fingerprint;
use crate::types::{FlowReport, LeakReport, PipelineReport, PressureReport, SegmentReport};

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

impl From<VolumeRate> for FlowReport {
    fn from(q: VolumeRate) -> Self {
        Self {
            m3_per_s: q.value,
            ft3_per_s: field::to_ft3ps(q),
        }
    }
}

impl From<Pressure> for PressureReport {
    fn from(p: Pressure) -> Self {
        Self {
            pa: p.value,
            psi: field::to_psi(p),
        }
    }
}

impl From<&LeakFlow> for LeakReport {
    fn from(leak: &LeakFlow) -> Self {
        Self {
            name: leak.name.clone(),
            location: leak.location,
            local_pressure: leak.local_pressure.into(),
            rate: leak.rate.into(),
            mass_flow_kg_s: leak.mass_rate().value,
            active: leak.active,
            severity: leak.severity.to_string(),
        }
    }
}

impl From<&SegmentResult> for SegmentReport {
    fn from(seg: &SegmentResult) -> Self {
        Self {
            index: seg.index,
            name: seg.name.clone(),
            gate: seg.gate.to_string(),
            blocked_by: seg.blocked_by,
            equation: seg.equation.key().to_string(),
            upstream_pressure: seg.upstream_pressure.into(),
            downstream_pressure: seg.downstream_pressure.into(),
            capacity_flow: seg.capacity_flow.into(),
            inlet_flow: seg.inlet_flow.into(),
            outlet_flow: seg.outlet_flow.into(),
            leak_flow: seg.leak_flow.into(),
            friction_factor: seg.friction_factor,
            regime: seg.regime.map(|r| r.to_string()),
            reynolds: seg.reynolds,
            velocity_m_per_s: seg.velocity.value,
            density_kg_m3: seg.density.map(|rho| rho.value),
            inlet_mass_flow_kg_s: seg.inlet_mass_flow.value,
            outlet_mass_flow_kg_s: seg.outlet_mass_flow.value,
            leaks: seg.leaks.iter().map(LeakReport::from).collect(),
        }
    }
}

impl PipelineReport {
    /// Builds a report with explicit provenance fields.
    pub fn from_result(
        result: &PipelineResult,
        fingerprint: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            pipeline: result.name.clone(),
            fingerprint: fingerprint.into(),
            timestamp: timestamp.into(),
            solver_version: SOLVER_VERSION.to_string(),
            inlet_flow: result.inlet_flow.into(),
            outlet_flow: result.outlet_flow.into(),
            total_leak: result.total_leak.into(),
            balance_residual: result.balance_residual.into(),
            inlet_mass_flow_kg_s: result.inlet_mass_flow.value,
            outlet_mass_flow_kg_s: result.outlet_mass_flow.value,
            total_leak_mass_kg_s: result.total_leak_mass.value,
            mass_balance_residual_kg_s: result.mass_balance_residual.value,
            blocked_at: result.blocked_at,
            segments: result.segments.iter().map(SegmentReport::from).collect(),
            warnings: result.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn segment(&self, name: &str) -> Option<&SegmentReport> {
        self.segments.iter().find(|s| s.name == name)
    }
}

/// Report for `result`, fingerprinted against the configuration that produced it
/// and stamped with the current UTC time.
pub fn build_report(def: &PipelineDef, result: &PipelineResult) -> PipelineReport {
    let fingerprint = config_fingerprint(def, SOLVER_VERSION);
    PipelineReport::from_result(result, fingerprint, chrono::Utc::now().to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::{m3ps, pa};

    #[test]
    fn flow_report_carries_both_units() {
        let q: FlowReport = field::ft3ps(10.0).into();
        assert!((q.ft3_per_s - 10.0).abs() < 1e-9);
        assert!((q.m3_per_s - 0.283_168_465_92).abs() < 1e-9);

        let zero: FlowReport = m3ps(0.0).into();
        assert_eq!(zero.ft3_per_s, 0.0);
    }

    #[test]
    fn pressure_report_carries_both_units() {
        let p: PressureReport = pa(689_475.729_3).into();
        assert!((p.psi - 100.0).abs() < 1e-6);
    }
}
