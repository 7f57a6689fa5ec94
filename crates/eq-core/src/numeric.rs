use crate::CoreError;
use nalgebra::RealField;

/// Floating point scalar the equilibrium data model is generic over.
///
/// `RealField` supplies the field arithmetic and transcendental functions
/// (`ln` for configurational entropy); the two bridges below are used for
/// tolerance comparison and error reporting, which always happen in `f64`.
pub trait Real: RealField + Copy {
    /// Convert an `f64` literal or tolerance into this precision.
    fn cast(v: f64) -> Self;

    /// Widen to `f64` for reporting.
    fn as_f64(self) -> f64;

    /// Machine epsilon of this precision, as `f64`.
    fn machine_epsilon() -> f64;
}

impl Real for f64 {
    #[inline]
    fn cast(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn machine_epsilon() -> f64 {
        f64::EPSILON
    }
}

impl Real for f32 {
    #[inline]
    fn cast(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn machine_epsilon() -> f64 {
        f32::EPSILON as f64
    }
}

/// One tolerance for everything
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
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
    /// Purely absolute tolerance.
    pub const fn absolute(abs: f64) -> Self {
        Self { abs, rel: 0.0 }
    }
}

/// Absolute tolerance for a sum of `terms` values of precision `T`: never
/// tighter than the rounding error such a sum can carry.
pub fn sum_tolerance<T: Real>(tol: Tolerances, terms: usize) -> Tolerances {
    let floor = terms.max(1) as f64 * T::machine_epsilon();
    Tolerances {
        abs: tol.abs.max(floor),
        rel: tol.rel,
    }
}

#[inline]
pub fn abs_diff<T: Real>(a: T, b: T) -> T {
    if a > b { a - b } else { b - a }
}

pub fn nearly_equal<T: Real>(a: T, b: T, tol: Tolerances) -> bool {
    let (a, b) = (a.as_f64(), b.as_f64());
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite<T: Real>(v: T, what: &'static str) -> Result<T, CoreError> {
    if v.as_f64().is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite {
            what,
            value: v.as_f64(),
        })
    }
}

/// Sum without requiring `Iterator::sum` on the generic scalar.
pub fn sum<T: Real>(values: impl IntoIterator<Item = T>) -> T {
    values.into_iter().fold(T::cast(0.0), |acc, v| acc + v)
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
    fn nearly_equal_absolute_only() {
        let tol = Tolerances::absolute(1e-6);
        assert!(nearly_equal(10.0, 10.0 + 5e-7, tol));
        assert!(!nearly_equal(10.0, 10.5, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn single_precision_bridges() {
        let x = f32::cast(0.25);
        assert_eq!(x, 0.25_f32);
        assert_eq!(x.as_f64(), 0.25);
        assert_eq!(abs_diff(0.5_f32, 0.75), 0.25);
        assert_eq!(sum([0.5_f32, 0.25, 0.25]), 1.0);
    }

    #[test]
    fn sum_tolerance_follows_precision() {
        let tol = Tolerances::absolute(1e-9);
        assert_eq!(sum_tolerance::<f64>(tol, 3).abs, 1e-9);
        let widened = sum_tolerance::<f32>(tol, 3).abs;
        assert_eq!(widened, 3.0 * f32::EPSILON as f64);
        // 0.01 + 0.78 + 0.21 rounds to 0.99999994 in f32
        let total = sum([0.01_f32, 0.78, 0.21]);
        assert!(nearly_equal(total, 1.0, sum_tolerance::<f32>(tol, 3)));
        assert!(!nearly_equal(total, 1.0, tol));
    }
}
