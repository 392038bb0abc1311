//! Error types for component operations.

use pf_core::PfError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// Segment, leak or valve configuration that cannot be evaluated:
    /// negative pressure drop, bad geometry, leak outside the segment,
    /// pressure below ambient.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Numeric error: {0}")]
    Numeric(#[from] PfError),
}

impl ComponentError {
    pub fn configuration(what: impl Into<String>) -> Self {
        ComponentError::Configuration { what: what.into() }
    }
}

pub type ComponentResult<T> = Result<T, ComponentError>;
