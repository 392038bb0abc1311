//! Orifice leak model.
//!
//! A leak is a sharp-edged hole at a fractional position along its segment.
//! Local pressure is interpolated linearly between the segment's boundary
//! pressures and the leak discharges to ambient:
//!
//! `Q = Cd·A·√(2·(P_local − P_ambient)/ρ)`, and zero when `P_local ≤ P_ambient`.
//!
//! Leak extraction is one-way: it reduces the segment's outlet flow but is
//! never fed back into the segment's own flow calculation.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use pf_core::units::{Area, Density, Length, MassRate, Pressure, VolumeRate, kgps, m, m2, m3ps};
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Leak {
    pub name: Option<String>,
    /// Fraction of segment length from the inlet, in [0, 1]
    pub location: f64,
    /// Orifice diameter
    pub diameter: Length,
    /// Discharge coefficient, 0 < Cd ≤ 1
    pub discharge_coefficient: f64,
    /// Inactive leaks stay in the configuration but contribute no flow
    pub active: bool,
}

impl Leak {
    pub const DEFAULT_DISCHARGE_COEFFICIENT: f64 = 0.6;

    pub fn new(location: f64, diameter: Length) -> Self {
        Self {
            name: None,
            location,
            diameter,
            discharge_coefficient: Self::DEFAULT_DISCHARGE_COEFFICIENT,
            active: true,
        }
    }

    /// Leak whose orifice has the given area.
    pub fn from_area(location: f64, area: Area) -> Self {
        let diameter = 2.0 * (area.value.max(0.0) / PI).sqrt();
        Self::new(location, m(diameter))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_discharge_coefficient(mut self, cd: f64) -> Self {
        self.discharge_coefficient = cd;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Orifice area `π·D²/4`.
    pub fn area(&self) -> Area {
        m2(PI * self.diameter.value.powi(2) / 4.0)
    }

    pub fn validate(&self) -> ComponentResult<()> {
        if !(0.0..=1.0).contains(&self.location) {
            return Err(ComponentError::configuration(format!(
                "leak location {} outside [0, 1]",
                self.location
            )));
        }
        if !self.diameter.value.is_finite() || self.diameter.value <= 0.0 {
            return Err(ComponentError::configuration(format!(
                "leak diameter {} m must be positive",
                self.diameter.value
            )));
        }
        let cd = self.discharge_coefficient;
        if !cd.is_finite() || cd <= 0.0 || cd > 1.0 {
            return Err(ComponentError::configuration(format!(
                "leak discharge coefficient {cd} outside (0, 1]"
            )));
        }
        Ok(())
    }

    /// Linear interpolation `P_up − (P_up − P_down)·location`.
    pub fn local_pressure(&self, upstream: Pressure, downstream: Pressure) -> Pressure {
        upstream - (upstream - downstream) * self.location
    }

    /// Volumetric discharge at local conditions. `density` is only read when
    /// the leak is active and pressurized above ambient.
    pub fn rate(
        &self,
        local_pressure: Pressure,
        ambient_pressure: Pressure,
        density: Density,
    ) -> ComponentResult<VolumeRate> {
        let dp = local_pressure.value - ambient_pressure.value;
        if !self.active || dp <= 0.0 {
            return Ok(m3ps(0.0));
        }
        check_finite(density.value, "leak density")?;
        if density.value <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "leak density must be positive",
            });
        }

        let q = self.discharge_coefficient * self.area().value * (2.0 * dp / density.value).sqrt();
        check_finite(q, "leak rate")?;
        Ok(m3ps(q))
    }

    pub fn severity(&self, rate: VolumeRate) -> LeakSeverity {
        LeakSeverity::classify(self.diameter, rate)
    }
}

/// Qualitative leak size for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeakSeverity {
    Pinhole,
    Small,
    Moderate,
    Large,
    Critical,
}

impl LeakSeverity {
    /// Weighted score: hole diameter (0–50 mm) counts 60 %, flow
    /// (0–1000 L/min) counts 40 %.
    pub fn classify(diameter: Length, rate: VolumeRate) -> Self {
        let diameter_mm = diameter.value * 1e3;
        let rate_lpm = rate.value * 1e3 * 60.0;

        let score = (diameter_mm / 50.0).clamp(0.0, 1.0) * 60.0
            + (rate_lpm / 1000.0).clamp(0.0, 1.0) * 40.0;

        if score < 10.0 {
            LeakSeverity::Pinhole
        } else if score < 25.0 {
            LeakSeverity::Small
        } else if score < 50.0 {
            LeakSeverity::Moderate
        } else if score < 75.0 {
            LeakSeverity::Large
        } else {
            LeakSeverity::Critical
        }
    }
}

impl fmt::Display for LeakSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeakSeverity::Pinhole => write!(f, "pinhole"),
            LeakSeverity::Small => write!(f, "small"),
            LeakSeverity::Moderate => write!(f, "moderate"),
            LeakSeverity::Large => write!(f, "large"),
            LeakSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Per-leak outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LeakFlow {
    pub name: Option<String>,
    pub location: f64,
    pub local_pressure: Pressure,
    pub rate: VolumeRate,
    /// Density sampled at the leak; `None` when no lookup was needed
    pub density: Option<Density>,
    pub active: bool,
    pub severity: LeakSeverity,
}

impl LeakFlow {
    pub fn mass_rate(&self) -> MassRate {
        kgps(self.density.map_or(0.0, |rho| rho.value * self.rate.value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeakSummary {
    pub leaks: Vec<LeakFlow>,
    pub total: VolumeRate,
    pub total_mass: MassRate,
}

impl LeakSummary {
    fn from_flows(leaks: Vec<LeakFlow>) -> Self {
        let total = m3ps(leaks.iter().map(|l| l.rate.value).sum());
        let total_mass = kgps(leaks.iter().map(|l| l.mass_rate().value).sum());
        Self {
            leaks,
            total,
            total_mass,
        }
    }
}

/// Evaluate every leak on a segment.
///
/// `density_at` is called once per active leak whose local pressure exceeds
/// ambient; inactive and depressurized leaks report zero without a lookup.
pub fn evaluate_leaks<E, F>(
    leaks: &[Leak],
    upstream: Pressure,
    downstream: Pressure,
    ambient: Pressure,
    mut density_at: F,
) -> Result<LeakSummary, E>
where
    E: From<ComponentError>,
    F: FnMut(Pressure) -> Result<Density, E>,
{
    let mut flows = Vec::with_capacity(leaks.len());
    for leak in leaks {
        leak.validate()?;
        let local_pressure = leak.local_pressure(upstream, downstream);
        let pressurized = local_pressure.value - ambient.value > 0.0;

        let (rate, density) = if leak.active && pressurized {
            let rho = density_at(local_pressure)?;
            (leak.rate(local_pressure, ambient, rho)?, Some(rho))
        } else {
            (m3ps(0.0), None)
        };

        flows.push(LeakFlow {
            name: leak.name.clone(),
            location: leak.location,
            local_pressure,
            rate,
            density,
            active: leak.active,
            severity: leak.severity(rate),
        });
    }
    Ok(LeakSummary::from_flows(flows))
}

/// Leaks on a segment that receives no flow: every rate is forced to zero and
/// the local pressure is the held segment pressure.
pub fn blocked_leaks(leaks: &[Leak], held_pressure: Pressure) -> LeakSummary {
    let flows = leaks
        .iter()
        .map(|leak| LeakFlow {
            name: leak.name.clone(),
            location: leak.location,
            local_pressure: held_pressure,
            rate: m3ps(0.0),
            density: None,
            active: leak.active,
            severity: leak.severity(m3ps(0.0)),
        })
        .collect();
    LeakSummary::from_flows(flows)
}
