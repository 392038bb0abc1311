//! Pipeline configuration schema.
//!
//! Every dimensional value is persisted as `{ value, unit }` and only turned
//! into SI by [`crate::compile`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineDef {
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    #[serde(default)]
    pub flow_type: FlowTypeDef,
    /// Default for segments that do not set their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_pressure: Option<UnitValueDef>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
}

impl PipelineDef {
    pub fn segment(&self, name: &str) -> Option<&SegmentDef> {
        self.segments.iter().find(|s| s.name == name)
    }

    pub fn segment_mut(&mut self, name: &str) -> Option<&mut SegmentDef> {
        self.segments.iter_mut().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitValueDef {
    pub value: f64,
    pub unit: String,
}

impl UnitValueDef {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    /// Species key, e.g. `CH4`, `H2O`, `N2`
    pub species: String,
    pub phase: PhaseDef,
    pub temperature: UnitValueDef,
    /// Overrides the property provider's molecular weight [g/mol]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecular_weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDef {
    Liquid,
    Gas,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowTypeDef {
    #[default]
    Compressible,
    Incompressible,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub name: String,
    pub length: UnitValueDef,
    pub diameter: UnitValueDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<UnitValueDef>,
    #[serde(default = "default_material")]
    pub material: String,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// Outlet minus inlet elevation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_change: Option<UnitValueDef>,
    pub upstream_pressure: UnitValueDef,
    pub downstream_pressure: UnitValueDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_pressure: Option<UnitValueDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_type: Option<FlowTypeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<UnitValueDef>,
    #[serde(default)]
    pub leaks: Vec<LeakDef>,
    #[serde(default)]
    pub valves: Vec<ValveDef>,
}

impl SegmentDef {
    pub fn new(
        name: impl Into<String>,
        length: UnitValueDef,
        diameter: UnitValueDef,
        upstream_pressure: UnitValueDef,
        downstream_pressure: UnitValueDef,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            diameter,
            roughness: None,
            material: default_material(),
            efficiency: default_efficiency(),
            elevation_change: None,
            upstream_pressure,
            downstream_pressure,
            ambient_pressure: None,
            flow_type: None,
            temperature: None,
            leaks: Vec::new(),
            valves: Vec::new(),
        }
    }

    pub fn valve(&self, position: ValvePositionDef) -> Option<&ValveDef> {
        self.valves.iter().find(|v| v.position == position)
    }
}

fn default_material() -> String {
    "steel".to_string()
}

fn default_efficiency() -> f64 {
    1.0
}

/// Leak orifice, sized by either `diameter` or `area`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeakDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fraction of segment length from the inlet
    pub location: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<UnitValueDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<UnitValueDef>,
    #[serde(default = "default_discharge_coefficient")]
    pub discharge_coefficient: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl LeakDef {
    pub fn with_diameter(location: f64, diameter: UnitValueDef) -> Self {
        Self {
            name: None,
            location,
            diameter: Some(diameter),
            area: None,
            discharge_coefficient: default_discharge_coefficient(),
            active: true,
        }
    }
}

fn default_discharge_coefficient() -> f64 {
    pf_components::Leak::DEFAULT_DISCHARGE_COEFFICIENT
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: ValvePositionDef,
    #[serde(default)]
    pub state: ValveStateDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValvePositionDef {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValveStateDef {
    #[default]
    Open,
    Closed,
}

/// Numeric settings; every field falls back to the solver default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_friction_tolerance")]
    pub friction_tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_friction_iterations: usize,
    #[serde(default = "default_max_iterations")]
    pub max_outer_iterations: usize,
    #[serde(default = "default_initial_friction_factor")]
    pub initial_friction_factor: f64,
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: f64,
    #[serde(default = "default_mass_balance_threshold")]
    pub mass_balance_threshold: f64,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            friction_tolerance: default_friction_tolerance(),
            max_friction_iterations: default_max_iterations(),
            max_outer_iterations: default_max_iterations(),
            initial_friction_factor: default_initial_friction_factor(),
            balance_tolerance: default_balance_tolerance(),
            mass_balance_threshold: default_mass_balance_threshold(),
        }
    }
}

fn default_friction_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    50
}

fn default_initial_friction_factor() -> f64 {
    0.02
}

fn default_balance_tolerance() -> f64 {
    1e-6
}

fn default_mass_balance_threshold() -> f64 {
    1e-3
}
