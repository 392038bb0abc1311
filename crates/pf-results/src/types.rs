//! Report data types.
//!
//! Plain serde records in reporting units: every flow carries m³/s and
//! ft³/s, every pressure Pa and psi. Gas-correlation flows are at base
//! conditions (14.7 psia, 60 °F); see each segment's `equation`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlowReport {
    pub m3_per_s: f64,
    pub ft3_per_s: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PressureReport {
    pub pa: f64,
    pub psi: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeakReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: f64,
    pub local_pressure: PressureReport,
    pub rate: FlowReport,
    pub mass_flow_kg_s: f64,
    pub active: bool,
    pub severity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentReport {
    pub index: usize,
    pub name: String,
    pub gate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<usize>,
    pub equation: String,
    pub upstream_pressure: PressureReport,
    pub downstream_pressure: PressureReport,
    pub capacity_flow: FlowReport,
    pub inlet_flow: FlowReport,
    pub outlet_flow: FlowReport,
    pub leak_flow: FlowReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regime: Option<String>,
    pub reynolds: f64,
    pub velocity_m_per_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_m3: Option<f64>,
    pub inlet_mass_flow_kg_s: f64,
    pub outlet_mass_flow_kg_s: f64,
    #[serde(default)]
    pub leaks: Vec<LeakReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineReport {
    pub pipeline: String,
    /// SHA-256 of the configuration snapshot that was solved
    pub fingerprint: String,
    /// RFC 3339
    pub timestamp: String,
    pub solver_version: String,
    pub inlet_flow: FlowReport,
    pub outlet_flow: FlowReport,
    pub total_leak: FlowReport,
    pub balance_residual: FlowReport,
    pub inlet_mass_flow_kg_s: f64,
    pub outlet_mass_flow_kg_s: f64,
    pub total_leak_mass_kg_s: f64,
    pub mass_balance_residual_kg_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_at: Option<usize>,
    pub segments: Vec<SegmentReport>,
    #[serde(default)]
    pub warnings: Vec<String>,
}
