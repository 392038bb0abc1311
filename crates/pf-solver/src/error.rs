//! Error types for pipeline solving.

use pf_components::ComponentError;
use pf_core::error::PfError;
use pf_fluids::FluidError;
use thiserror::Error;

/// Why a single segment could not be evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("property lookup failed at {pressure_pa:.1} Pa, {temperature_k:.2} K: {source}")]
    PropertyLookup {
        pressure_pa: f64,
        temperature_k: f64,
        source: FluidError,
    },
}

/// Errors that abort a pipeline solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("pipeline has no segments")]
    EmptyPipeline,

    #[error("invalid solver settings: {what}")]
    InvalidSettings { what: String },

    /// One failing segment fails the whole chain; nothing downstream of it is
    /// evaluated.
    #[error("segment {index} ('{name}'): {source}")]
    Segment {
        index: usize,
        name: String,
        source: SegmentError,
    },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Index of the offending segment, if the failure belongs to one.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            SolverError::Segment { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<SolverError> for PfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::EmptyPipeline => PfError::InvalidArg { what: "empty pipeline" },
            SolverError::InvalidSettings { .. } => PfError::InvalidArg {
                what: "solver settings",
            },
            SolverError::Segment { .. } => PfError::InvalidArg { what: "segment" },
        }
    }
}
