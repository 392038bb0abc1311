//! Darcy friction factor.
//!
//! Regimes by Reynolds number:
//! - `Re < 2000`: laminar, `f = 64/Re`
//! - `2000 <= Re <= 4000`: transitional, linear in Re between the laminar value
//!   at 2000 and the turbulent-branch value at 4000
//! - `Re > 4000`, smooth wall: Blasius `f = 0.3164·Re^-0.25`, flagged when
//!   `Re >= 1e5` where the fit is no longer trustworthy
//! - `Re > 4000`, rough wall: Colebrook-White solved by Newton on `x = 1/√f`,
//!   seeded from Swamee-Jain
//!
//! The interpolation makes `f` continuous at both regime boundaries.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use pf_core::{NewtonConfig, newton_scalar};
use std::f64::consts::LN_10;
use std::fmt;

pub const LAMINAR_LIMIT: f64 = 2000.0;
pub const TURBULENT_LIMIT: f64 = 4000.0;
pub const BLASIUS_LIMIT: f64 = 1.0e5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowRegime::Laminar => write!(f, "laminar"),
            FlowRegime::Transitional => write!(f, "transitional"),
            FlowRegime::Turbulent => write!(f, "turbulent"),
        }
    }
}

/// Non-fatal conditions attached to a friction estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrictionWarning {
    /// Iteration cap reached before the relative tolerance was met.
    ConvergenceCap { reynolds: f64, iterations: usize },
    /// Blasius used outside `Re < 1e5`.
    BlasiusOutOfRange { reynolds: f64 },
}

impl fmt::Display for FrictionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrictionWarning::ConvergenceCap {
                reynolds,
                iterations,
            } => write!(
                f,
                "friction factor did not converge at Re={reynolds:.0} after {iterations} iterations"
            ),
            FrictionWarning::BlasiusOutOfRange { reynolds } => write!(
                f,
                "Blasius friction factor used at Re={reynolds:.0}, beyond its validated range"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionSettings {
    pub rel_tol: f64,
    pub max_iterations: usize,
}

impl Default for FrictionSettings {
    fn default() -> Self {
        Self {
            rel_tol: 1e-6,
            max_iterations: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionEstimate {
    pub factor: f64,
    pub regime: FlowRegime,
    pub iterations: usize,
    pub warning: Option<FrictionWarning>,
}

impl FrictionEstimate {
    fn closed_form(factor: f64, regime: FlowRegime) -> Self {
        Self {
            factor,
            regime,
            iterations: 0,
            warning: None,
        }
    }
}

/// Darcy friction factor for Reynolds number `reynolds` and relative
/// roughness `relative_roughness` (ε/D).
pub fn friction_factor(
    reynolds: f64,
    relative_roughness: f64,
    settings: &FrictionSettings,
) -> ComponentResult<FrictionEstimate> {
    check_finite(reynolds, "Reynolds number")?;
    check_finite(relative_roughness, "relative roughness")?;
    if reynolds <= 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "Reynolds number must be positive",
        });
    }
    if relative_roughness < 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "relative roughness must be non-negative",
        });
    }

    if reynolds < LAMINAR_LIMIT {
        return Ok(FrictionEstimate::closed_form(
            laminar(reynolds),
            FlowRegime::Laminar,
        ));
    }

    if reynolds <= TURBULENT_LIMIT {
        let f_lam = laminar(LAMINAR_LIMIT);
        let turb = turbulent(TURBULENT_LIMIT, relative_roughness, settings)?;
        let w = (reynolds - LAMINAR_LIMIT) / (TURBULENT_LIMIT - LAMINAR_LIMIT);
        return Ok(FrictionEstimate {
            factor: f_lam + w * (turb.factor - f_lam),
            regime: FlowRegime::Transitional,
            iterations: turb.iterations,
            warning: turb.warning,
        });
    }

    turbulent(reynolds, relative_roughness, settings)
}

#[inline]
pub fn laminar(reynolds: f64) -> f64 {
    64.0 / reynolds
}

/// Blasius smooth-pipe correlation.
#[inline]
pub fn blasius(reynolds: f64) -> f64 {
    0.3164 * reynolds.powf(-0.25)
}

/// Swamee-Jain explicit approximation of Colebrook-White.
pub fn swamee_jain(reynolds: f64, relative_roughness: f64) -> f64 {
    let a = relative_roughness / 3.7;
    let b = 5.74 / reynolds.powf(0.9);
    0.25 / (a + b).log10().powi(2)
}

/// Colebrook-White, `1/√f = −2·log10(ε/(3.7D) + 2.51/(Re·√f))`.
pub fn colebrook_white(
    reynolds: f64,
    relative_roughness: f64,
    settings: &FrictionSettings,
) -> ComponentResult<FrictionEstimate> {
    let a = relative_roughness / 3.7;
    let b = 2.51 / reynolds;
    let seed = 1.0 / swamee_jain(reynolds, relative_roughness).sqrt();

    let config = NewtonConfig {
        max_iterations: settings.max_iterations,
        rel_tol: settings.rel_tol,
        abs_tol: 0.0,
    };
    // g(x) = x + 2·log10(a + b·x)
    let outcome = newton_scalar(
        seed,
        |x| {
            let arg = a + b * x;
            (x + 2.0 * arg.log10(), 1.0 + 2.0 * b / (arg * LN_10))
        },
        &config,
    )?;

    let factor = 1.0 / (outcome.root * outcome.root);
    check_finite(factor, "Colebrook-White friction factor")?;

    let warning = if outcome.converged {
        None
    } else {
        tracing::trace!(reynolds, iterations = outcome.iterations, "Colebrook-White hit iteration cap");
        Some(FrictionWarning::ConvergenceCap {
            reynolds,
            iterations: outcome.iterations,
        })
    };

    Ok(FrictionEstimate {
        factor,
        regime: FlowRegime::Turbulent,
        iterations: outcome.iterations,
        warning,
    })
}

fn turbulent(
    reynolds: f64,
    relative_roughness: f64,
    settings: &FrictionSettings,
) -> ComponentResult<FrictionEstimate> {
    if relative_roughness > 0.0 {
        return colebrook_white(reynolds, relative_roughness, settings);
    }

    let mut estimate = FrictionEstimate::closed_form(blasius(reynolds), FlowRegime::Turbulent);
    if reynolds >= BLASIUS_LIMIT {
        estimate.warning = Some(FrictionWarning::BlasiusOutOfRange { reynolds });
    }
    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(re: f64, rr: f64) -> FrictionEstimate {
        friction_factor(re, rr, &FrictionSettings::default()).unwrap()
    }

    #[test]
    fn laminar_closed_form() {
        let est = f(1000.0, 1e-4);
        assert_eq!(est.regime, FlowRegime::Laminar);
        assert!((est.factor - 0.064).abs() < 1e-15);
        assert!(est.warning.is_none());
    }

    #[test]
    fn blasius_smooth_pipe() {
        let est = f(1.0e4, 0.0);
        assert_eq!(est.regime, FlowRegime::Turbulent);
        assert!((est.factor - 0.3164 / 10.0).abs() < 1e-12);
        assert!(est.warning.is_none());
    }

    #[test]
    fn blasius_flags_high_reynolds() {
        let est = f(5.0e5, 0.0);
        assert!(matches!(
            est.warning,
            Some(FrictionWarning::BlasiusOutOfRange { .. })
        ));
        assert!((est.factor - blasius(5.0e5)).abs() < 1e-15);
    }

    #[test]
    fn colebrook_matches_moody_chart() {
        // Re = 1e5, ε/D = 1e-4: f ≈ 0.0185
        let est = f(1.0e5, 1.0e-4);
        assert!((est.factor - 0.0185).abs() < 5e-4, "f = {}", est.factor);
        assert!(est.warning.is_none());

        // Fully rough: Re = 1e8, ε/D = 0.01: f ≈ 0.0379
        let est = f(1.0e8, 0.01);
        assert!((est.factor - 0.0379).abs() < 5e-4, "f = {}", est.factor);
    }

    #[test]
    fn colebrook_root_satisfies_equation() {
        let (re, rr) = (2.5e5, 3.0e-4);
        let est = f(re, rr);
        let lhs = 1.0 / est.factor.sqrt();
        let rhs = -2.0 * (rr / 3.7 + 2.51 / (re * est.factor.sqrt())).log10();
        assert!((lhs - rhs).abs() / lhs < 1e-6);
    }

    #[test]
    fn colebrook_cap_warns_but_returns_estimate() {
        let settings = FrictionSettings {
            rel_tol: 1e-300,
            max_iterations: 1,
        };
        let est = friction_factor(1.0e6, 1.0e-3, &settings).unwrap();
        assert!(matches!(
            est.warning,
            Some(FrictionWarning::ConvergenceCap { iterations: 1, .. })
        ));
        assert!(est.factor > 0.0 && est.factor.is_finite());
    }

    #[test]
    fn continuous_across_regime_boundaries() {
        for rr in [0.0, 1e-4, 1e-2] {
            let below = f(LAMINAR_LIMIT - 1e-6, rr).factor;
            let at = f(LAMINAR_LIMIT, rr).factor;
            assert!((below - at).abs() < 1e-8, "Re=2000, rr={rr}");

            let at4k = f(TURBULENT_LIMIT, rr).factor;
            let above = f(TURBULENT_LIMIT + 1e-6, rr).factor;
            assert!((above - at4k).abs() < 1e-8, "Re=4000, rr={rr}");
        }
    }

    #[test]
    fn transitional_is_linear_in_reynolds() {
        let lo = f(2000.0, 1e-4).factor;
        let hi = f(4000.0, 1e-4).factor;
        let mid = f(3000.0, 1e-4);
        assert_eq!(mid.regime, FlowRegime::Transitional);
        assert!((mid.factor - 0.5 * (lo + hi)).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_inputs() {
        let s = FrictionSettings::default();
        assert!(friction_factor(0.0, 0.0, &s).is_err());
        assert!(friction_factor(-5.0, 0.0, &s).is_err());
        assert!(friction_factor(1e4, -1e-3, &s).is_err());
        assert!(friction_factor(f64::NAN, 0.0, &s).is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn factor_positive_and_finite(re in 10.0f64..1e8, rr in 0.0f64..0.05) {
                let est = friction_factor(re, rr, &FrictionSettings::default()).unwrap();
                prop_assert!(est.factor.is_finite());
                prop_assert!(est.factor > 0.0);
            }

            #[test]
            fn rough_never_below_smooth_in_turbulence(re in 4001.0f64..1e5, rr in 1e-6f64..0.05) {
                let s = FrictionSettings::default();
                let rough = friction_factor(re, rr, &s).unwrap().factor;
                let smooth_cw = colebrook_white(re, 1e-12, &s).unwrap().factor;
                prop_assert!(rough >= smooth_cw * (1.0 - 1e-6));
            }
        }
    }
}
