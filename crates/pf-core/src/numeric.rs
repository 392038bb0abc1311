use crate::PfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Purely relative tolerance with a tiny absolute floor for values near zero.
    pub fn relative(rel: Real) -> Self {
        Self { abs: 1e-12, rel }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Residual scaled by a reference magnitude. Returns the raw residual when the
/// reference is zero so that an empty balance stays at zero.
pub fn relative_residual(residual: Real, reference: Real) -> Real {
    if reference.abs() > 0.0 {
        residual.abs() / reference.abs()
    } else {
        residual.abs()
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn relative_tolerance_scales() {
        let tol = Tolerances::relative(1e-6);
        assert!(nearly_equal(1.0e6, 1.0e6 + 0.5, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-3, tol));
    }

    #[test]
    fn relative_residual_handles_zero_reference() {
        assert_eq!(relative_residual(0.0, 0.0), 0.0);
        assert_eq!(relative_residual(2.0, 0.0), 2.0);
        assert!((relative_residual(-1.0, 4.0) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }
}
