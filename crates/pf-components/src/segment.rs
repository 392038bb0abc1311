//! Pipe segment record.

use crate::equation::FlowType;
use crate::error::{ComponentError, ComponentResult};
use crate::leak::Leak;
use crate::valve::{Valve, ValvePosition};
use pf_core::units::constants::ATM_PA;
use pf_core::units::{Area, Length, Pressure, Temperature, m, m2, pa};
use std::f64::consts::PI;

/// One pipe section with fixed boundary pressures.
///
/// Created and edited by the configuration layer; the solver reads it and
/// never writes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub length: Length,
    /// Internal diameter
    pub diameter: Length,
    /// Absolute wall roughness
    pub roughness: Length,
    pub material: String,
    /// Pipeline efficiency factor, 0 < E ≤ 1
    pub efficiency: f64,
    /// Outlet elevation minus inlet elevation
    pub elevation_change: Length,
    pub upstream_pressure: Pressure,
    pub downstream_pressure: Pressure,
    pub ambient_pressure: Pressure,
    pub flow_type: FlowType,
    /// Overrides the pipeline fluid temperature for this segment
    pub temperature: Option<Temperature>,
    pub leaks: Vec<Leak>,
    pub start_valve: Option<Valve>,
    pub end_valve: Option<Valve>,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        length: Length,
        diameter: Length,
        upstream_pressure: Pressure,
        downstream_pressure: Pressure,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            diameter,
            roughness: m(0.0),
            material: "steel".to_string(),
            efficiency: 1.0,
            elevation_change: m(0.0),
            upstream_pressure,
            downstream_pressure,
            ambient_pressure: pa(ATM_PA),
            flow_type: FlowType::Compressible,
            temperature: None,
            leaks: Vec::new(),
            start_valve: None,
            end_valve: None,
        }
    }

    pub fn with_roughness(mut self, roughness: Length) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    pub fn with_elevation_change(mut self, elevation_change: Length) -> Self {
        self.elevation_change = elevation_change;
        self
    }

    pub fn with_ambient_pressure(mut self, ambient: Pressure) -> Self {
        self.ambient_pressure = ambient;
        self
    }

    pub fn with_flow_type(mut self, flow_type: FlowType) -> Self {
        self.flow_type = flow_type;
        self
    }

    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_leak(mut self, leak: Leak) -> Self {
        self.leaks.push(leak);
        self
    }

    pub fn with_valve(mut self, position: ValvePosition, valve: Valve) -> Self {
        self.set_valve(position, Some(valve));
        self
    }

    pub fn valve(&self, position: ValvePosition) -> Option<&Valve> {
        match position {
            ValvePosition::Start => self.start_valve.as_ref(),
            ValvePosition::End => self.end_valve.as_ref(),
        }
    }

    pub fn valve_mut(&mut self, position: ValvePosition) -> Option<&mut Valve> {
        match position {
            ValvePosition::Start => self.start_valve.as_mut(),
            ValvePosition::End => self.end_valve.as_mut(),
        }
    }

    pub fn set_valve(&mut self, position: ValvePosition, valve: Option<Valve>) {
        match position {
            ValvePosition::Start => self.start_valve = valve,
            ValvePosition::End => self.end_valve = valve,
        }
    }

    pub fn pressure_drop(&self) -> Pressure {
        self.upstream_pressure - self.downstream_pressure
    }

    pub fn mean_pressure(&self) -> Pressure {
        (self.upstream_pressure + self.downstream_pressure) * 0.5
    }

    /// Linearly interpolated pressure at fractional `location` from the inlet.
    pub fn pressure_at(&self, location: f64) -> Pressure {
        self.upstream_pressure - self.pressure_drop() * location.clamp(0.0, 1.0)
    }

    /// Flow cross-section `π·D²/4`.
    pub fn area(&self) -> Area {
        m2(PI * self.diameter.value.powi(2) / 4.0)
    }

    /// ε/D
    pub fn relative_roughness(&self) -> f64 {
        self.roughness.value / self.diameter.value
    }

    /// Check geometry, efficiency, pressures against ambient, and every leak.
    pub fn validate(&self) -> ComponentResult<()> {
        let name = &self.name;
        let positive = |value: f64, what: &str| -> ComponentResult<()> {
            if !value.is_finite() || value <= 0.0 {
                return Err(ComponentError::configuration(format!(
                    "segment '{name}': {what} must be positive, got {value}"
                )));
            }
            Ok(())
        };

        positive(self.length.value, "length")?;
        positive(self.diameter.value, "diameter")?;

        if !self.roughness.value.is_finite() || self.roughness.value < 0.0 {
            return Err(ComponentError::configuration(format!(
                "segment '{name}': roughness must be non-negative, got {}",
                self.roughness.value
            )));
        }
        if !self.elevation_change.value.is_finite() {
            return Err(ComponentError::configuration(format!(
                "segment '{name}': elevation change must be finite"
            )));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(ComponentError::configuration(format!(
                "segment '{name}': efficiency {} outside (0, 1]",
                self.efficiency
            )));
        }

        let ambient = self.ambient_pressure.value;
        if !ambient.is_finite() || ambient < 0.0 {
            return Err(ComponentError::configuration(format!(
                "segment '{name}': ambient pressure must be non-negative, got {ambient} Pa"
            )));
        }
        for (label, p) in [
            ("upstream", self.upstream_pressure.value),
            ("downstream", self.downstream_pressure.value),
        ] {
            if !p.is_finite() {
                return Err(ComponentError::configuration(format!(
                    "segment '{name}': {label} pressure must be finite"
                )));
            }
            if p < ambient {
                return Err(ComponentError::configuration(format!(
                    "segment '{name}': {label} pressure {p:.1} Pa below ambient {ambient:.1} Pa"
                )));
            }
        }
        if self.pressure_drop().value < 0.0 {
            return Err(ComponentError::configuration(format!(
                "segment '{name}': negative pressure drop ({:.1} Pa upstream < {:.1} Pa downstream)",
                self.upstream_pressure.value, self.downstream_pressure.value
            )));
        }

        for leak in &self.leaks {
            leak.validate().map_err(|e| match e {
                ComponentError::Configuration { what } => {
                    ComponentError::configuration(format!("segment '{name}': {what}"))
                }
                other => other,
            })?;
            if leak.diameter.value > self.diameter.value {
                return Err(ComponentError::configuration(format!(
                    "segment '{name}': leak diameter {} m exceeds pipe diameter {} m",
                    leak.diameter.value, self.diameter.value
                )));
            }
        }
        Ok(())
    }
}
