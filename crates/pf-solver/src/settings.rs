//! Solver settings.

use crate::error::{SolverError, SolverResult};
use pf_components::FlowSettings;
use pf_core::numeric::Tolerances;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub flow: FlowSettings,
    /// Volumetric balance `inlet − outlet − leaks` relative to inlet
    pub balance_tolerance: Tolerances,
    /// Relative mass-balance residual above which a warning is attached
    pub mass_balance_threshold: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            flow: FlowSettings::default(),
            balance_tolerance: Tolerances::relative(1e-6),
            mass_balance_threshold: 1e-3,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> SolverResult<()> {
        let invalid = |what: &str| SolverError::InvalidSettings { what: what.into() };

        let friction = &self.flow.friction;
        if !(friction.rel_tol.is_finite() && friction.rel_tol > 0.0) {
            return Err(invalid("friction tolerance must be positive"));
        }
        if friction.max_iterations == 0 {
            return Err(invalid("friction iteration cap must be at least 1"));
        }
        if self.flow.max_outer_iterations == 0 {
            return Err(invalid("Darcy-Weisbach iteration cap must be at least 1"));
        }
        if !(self.flow.initial_friction_factor.is_finite() && self.flow.initial_friction_factor > 0.0)
        {
            return Err(invalid("initial friction factor must be positive"));
        }
        if !(self.balance_tolerance.rel >= 0.0 && self.balance_tolerance.abs >= 0.0) {
            return Err(invalid("balance tolerance must be non-negative"));
        }
        if !(self.mass_balance_threshold.is_finite() && self.mass_balance_threshold >= 0.0) {
            return Err(invalid("mass balance threshold must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = SolverSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.flow.friction.max_iterations, 50);
        assert_eq!(s.balance_tolerance.rel, 1e-6);
    }

    #[test]
    fn zero_iteration_cap_rejected() {
        let mut s = SolverSettings::default();
        s.flow.friction.max_iterations = 0;
        assert!(matches!(s.validate(), Err(SolverError::InvalidSettings { .. })));
    }
}
