//! Assertion utilities for testing.
//!
//! Floating-point comparisons for scalars and grids.

use ndarray::ArrayView2;

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two grids have the same shape and approximately equal cells.
///
/// # Panics
///
/// Panics if the shapes differ or if any cell comparison fails.
pub fn assert_grid_approx_eq(actual: ArrayView2<f64>, expected: ArrayView2<f64>, epsilon: Option<f64>) {
    assert_eq!(
        actual.dim(),
        expected.dim(),
        "Grids have different shapes: actual = {:?}, expected = {:?}",
        actual.dim(),
        expected.dim()
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for ((idx, a), e) in actual.indexed_iter().zip(expected.iter()) {
        let diff = (a - e).abs();
        assert!(
            diff <= eps,
            "Grids differ at {:?}: actual = {}, expected = {}, diff = {}, epsilon = {}",
            idx,
            a,
            e,
            diff,
            eps
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0 + 1e-12, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_grid_approx_eq() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[1.0, 2.0], [3.0, 4.0 + 1e-12]];
        assert_grid_approx_eq(a.view(), b.view(), None);
    }
}
