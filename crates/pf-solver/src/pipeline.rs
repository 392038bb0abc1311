//! Immutable pipeline snapshot handed to the solver.

use pf_components::Segment;
use pf_core::units::{Length, Pressure, Temperature, m};
use pf_fluids::{FluidModel, FluidResult, FluidState, Phase, Species};

/// What flows through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidSpec {
    pub species: Species,
    pub phase: Phase,
    /// Default temperature for segments without their own
    pub temperature: Temperature,
    /// Overrides the provider's molecular weight [g/mol] when set
    pub molecular_weight: Option<f64>,
}

impl FluidSpec {
    pub fn new(species: Species, phase: Phase, temperature: Temperature) -> Self {
        Self {
            species,
            phase,
            temperature,
            molecular_weight: None,
        }
    }

    pub fn with_molecular_weight(mut self, molecular_weight: f64) -> Self {
        self.molecular_weight = Some(molecular_weight);
        self
    }

    /// Ask `model` for a fresh state at (P, T).
    pub fn sample(
        &self,
        model: &dyn FluidModel,
        pressure: Pressure,
        temperature: Temperature,
    ) -> FluidResult<FluidState> {
        let mut state = model.state(self.species, self.phase, pressure, temperature)?;
        if let Some(mw) = self.molecular_weight {
            state.properties.molecular_weight = mw;
        }
        Ok(state)
    }
}

/// Ordered chain of segments, first segment at the inlet.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub name: String,
    pub fluid: FluidSpec,
    pub segments: Vec<Segment>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, fluid: FluidSpec) -> Self {
        Self {
            name: name.into(),
            fluid,
            segments: Vec::new(),
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segment_temperature(&self, segment: &Segment) -> Temperature {
        segment.temperature.unwrap_or(self.fluid.temperature)
    }

    pub fn total_length(&self) -> Length {
        m(self.segments.iter().map(|s| s.length.value).sum())
    }

    pub fn leak_count(&self) -> usize {
        self.segments.iter().map(|s| s.leaks.len()).sum()
    }
}
