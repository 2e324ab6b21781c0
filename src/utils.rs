//! Utility functions and types used accross the library
use crate::Scalar;

/// Wrap value into `[0, 1)` range
#[inline]
pub(crate) fn fract_euclid(value: Scalar) -> Scalar {
    let value = value.rem_euclid(1.0);
    // `rem_euclid` can round up to exactly 1.0 for tiny negative values
    if value >= 1.0 { 0.0 } else { value }
}

/// Triangle wave with period 2, maps `0 -> 0`, `1 -> 1`, `2 -> 0`
#[inline]
pub(crate) fn triangle(value: Scalar) -> Scalar {
    ((value + 1.0).rem_euclid(2.0) - 1.0).abs()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[macro_export]
    macro_rules! assert_approx_eq {
        ( $v0:expr, $v1: expr ) => {{
            assert!(($v0 - $v1).abs() < $crate::EPSILON, "{} != {}", $v0, $v1);
        }};
        ( $v0:expr, $v1: expr, $e: expr ) => {{
            assert!(($v0 - $v1).abs() < $e, "{} != {}", $v0, $v1);
        }};
    }

    #[test]
    fn test_fract_euclid() {
        assert_approx_eq!(fract_euclid(0.25), 0.25);
        assert_approx_eq!(fract_euclid(-0.25), 0.75);
        assert_approx_eq!(fract_euclid(3.5), 0.5);
        assert!(fract_euclid(-1e-20) < 1.0);
    }

    #[test]
    fn test_triangle() {
        assert_approx_eq!(triangle(0.0), 0.0);
        assert_approx_eq!(triangle(0.5), 0.5);
        assert_approx_eq!(triangle(1.0), 1.0);
        assert_approx_eq!(triangle(1.5), 0.5);
        assert_approx_eq!(triangle(-0.3), 0.3, 1e-9);
        assert_approx_eq!(triangle(2.3), 0.3, 1e-9);
    }
}
