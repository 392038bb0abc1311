//! Bounded Newton iteration for scalar equations.
//!
//! Implicit correlations (Colebrook-White in particular) are solved here rather
//! than inline so the iteration cap and stopping rule live in one place. The
//! routine never fails on a hit cap: it hands back the last iterate with
//! `converged = false` and lets the caller decide how loudly to complain.

use crate::error::{PfError, PfResult};

/// Newton iteration configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Relative step tolerance |dx| / |x|
    pub rel_tol: f64,
    /// Absolute tolerance on the residual
    pub abs_tol: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            rel_tol: 1e-6,
            abs_tol: 1e-12,
        }
    }
}

/// Scalar Newton result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonOutcome {
    /// Best estimate of the root
    pub root: f64,
    /// Residual at `root`
    pub residual: f64,
    /// Number of Newton steps taken
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Solve `g(x) = 0` starting from `x0`.
///
/// `eval` returns `(g(x), g'(x))`. A zero or non-finite derivative is an error;
/// exhausting `max_iterations` is not.
pub fn newton_scalar<F>(x0: f64, mut eval: F, config: &NewtonConfig) -> PfResult<NewtonOutcome>
where
    F: FnMut(f64) -> (f64, f64),
{
    if !x0.is_finite() {
        return Err(PfError::NonFinite {
            what: "newton initial guess",
            value: x0,
        });
    }
    if config.max_iterations == 0 {
        return Err(PfError::InvalidArg {
            what: "newton max_iterations must be at least 1",
        });
    }

    let mut x = x0;
    let (mut g, mut dg) = eval(x);

    for iter in 0..config.max_iterations {
        if !g.is_finite() {
            return Err(PfError::NonFinite {
                what: "newton residual",
                value: g,
            });
        }
        if g.abs() <= config.abs_tol {
            return Ok(NewtonOutcome {
                root: x,
                residual: g,
                iterations: iter,
                converged: true,
            });
        }
        if !dg.is_finite() || dg == 0.0 {
            return Err(PfError::Invariant {
                what: "newton derivative vanished",
            });
        }

        let dx = -g / dg;
        x += dx;
        (g, dg) = eval(x);

        if dx.abs() <= config.rel_tol * x.abs() {
            return Ok(NewtonOutcome {
                root: x,
                residual: g,
                iterations: iter + 1,
                converged: true,
            });
        }
    }

    Ok(NewtonOutcome {
        root: x,
        residual: g,
        iterations: config.max_iterations,
        converged: false,
    })
}
