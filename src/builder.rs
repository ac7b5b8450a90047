//! Grid sample builder.
//!
//! Converts a dense grid evaluation of a reference field into the flat
//! [`SampleSet`] a backend consumes, and writes model evaluations back into
//! grid form.
//!
//! The two directions do not index the coordinate arrays the same way.
//! [`flatten`] walks the grid column by column and reads the coordinates at
//! `(j, i)`, while [`evaluate_onto_grid`] reads them at `(i, j)`. Under
//! [`IndexOrder::Reference`] the sample values are taken in row-major order,
//! which on a square grid pairs the point at cell `(j, i)` with the value at
//! cell `(i, j)`. [`IndexOrder::Aligned`] pairs every point with the value of
//! its own cell instead.

use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::backend::Model;
use crate::error::{GridError, Result};
use crate::sample::SampleSet;

/// Which value is paired with each flattened point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOrder {
    /// Sample `k` takes the `k`-th value of the field in row-major order
    #[default]
    Reference,
    /// Sample `k` takes the value of the cell its point was read from
    Aligned,
}

impl FromStr for IndexOrder {
    type Err = GridError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" => Ok(IndexOrder::Reference),
            "aligned" => Ok(IndexOrder::Aligned),
            _ => Err(GridError::InvalidParameter {
                param: "index_order".to_string(),
                message: format!("Unknown index order: {}", s),
            }),
        }
    }
}

/// What to do when a single evaluation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalErrorPolicy {
    /// Return the model's error unchanged
    #[default]
    Abort,
    /// Store NaN in the failed cell and continue
    Nan,
}

impl FromStr for EvalErrorPolicy {
    type Err = GridError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(EvalErrorPolicy::Abort),
            "nan" => Ok(EvalErrorPolicy::Nan),
            _ => Err(GridError::InvalidParameter {
                param: "on_error".to_string(),
                message: format!("Unknown evaluation error policy: {}", s),
            }),
        }
    }
}

fn check_shapes(names: [&str; 3], shapes: [(usize, usize); 3]) -> Result<()> {
    if shapes[1] != shapes[0] || shapes[2] != shapes[0] {
        return Err(GridError::shape(format!(
            "{} is {:?}, {} is {:?}, {} is {:?}",
            names[0], shapes[0], names[1], shapes[1], names[2], shapes[2]
        )));
    }
    Ok(())
}

/// Flatten coordinate grids and a value grid into a sample set.
///
/// `x1`, `x2` and `y` must share the shape `(N2, N1)`. Sample `k = i * N2 + j`
/// for `i < N1`, `j < N2` has the point `[x1[j, i], x2[j, i]]`; its value is
/// chosen by `order`.
pub fn flatten(
    x1: ArrayView2<'_, f64>,
    x2: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    order: IndexOrder,
) -> Result<SampleSet> {
    check_shapes(["x1", "x2", "y"], [x1.dim(), x2.dim(), y.dim()])?;

    let (n2, n1) = x1.dim();
    let mut coordinates = Vec::with_capacity(2 * n1 * n2);
    let mut values = Vec::with_capacity(n1 * n2);

    // Row-major walk of y, for the reference pairing
    let mut row_major = y.iter();

    for i in 0..n1 {
        for j in 0..n2 {
            coordinates.push(x1[[j, i]]);
            coordinates.push(x2[[j, i]]);
            let value = match order {
                IndexOrder::Reference => row_major.next().copied(),
                IndexOrder::Aligned => Some(y[[j, i]]),
            };
            values.push(value.ok_or_else(|| GridError::shape("value grid exhausted"))?);
        }
    }

    SampleSet::from_flat(2, coordinates, values)
}

/// Rebuild a value grid of the given shape from flattened samples.
///
/// Inverse of the value mapping used by [`flatten`] with the same `order`.
pub fn regrid(samples: &SampleSet, shape: (usize, usize), order: IndexOrder) -> Result<Array2<f64>> {
    let (n2, n1) = shape;
    if samples.len() != n1 * n2 {
        return Err(GridError::shape(format!(
            "{} samples cannot fill a {:?} grid",
            samples.len(),
            shape
        )));
    }

    let values = samples.values();
    let grid = match order {
        IndexOrder::Reference => Array2::from_shape_fn(shape, |(r, c)| values[r * n1 + c]),
        IndexOrder::Aligned => Array2::from_shape_fn(shape, |(r, c)| values[c * n2 + r]),
    };
    Ok(grid)
}

/// Evaluate a model at every grid cell and store the results in `out`.
///
/// `out[i, j]` is overwritten with `model.evaluate([x1[i, j], x2[i, j]])`;
/// `out` is never read. Shapes are checked before the first write. Under
/// [`EvalErrorPolicy::Abort`] the first model error is returned unchanged and
/// cells already written keep their new values. Returns the number of cells
/// set to NaN under [`EvalErrorPolicy::Nan`].
pub fn evaluate_onto_grid(
    model: &dyn Model,
    x1: ArrayView2<'_, f64>,
    x2: ArrayView2<'_, f64>,
    mut out: ArrayViewMut2<'_, f64>,
    policy: EvalErrorPolicy,
) -> Result<usize> {
    check_shapes(["x1", "x2", "out"], [x1.dim(), x2.dim(), out.dim()])?;

    let mut substituted = 0;
    for ((idx, cell), (&c1, &c2)) in out
        .indexed_iter_mut()
        .zip(x1.iter().zip(x2.iter()))
    {
        *cell = match model.evaluate(&[c1, c2]) {
            Ok(value) => value,
            Err(e) => match policy {
                EvalErrorPolicy::Abort => return Err(e),
                EvalErrorPolicy::Nan => {
                    warn!(row = idx.0, col = idx.1, x1 = c1, x2 = c2, error = %e, "Evaluation failed, storing NaN");
                    substituted += 1;
                    f64::NAN
                }
            },
        };
    }

    Ok(substituted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Axis, Grid, Indexing};
    use ndarray::array;

    #[derive(Debug)]
    struct SumModel;

    impl Model for SumModel {
        fn evaluate(&self, point: &[f64]) -> Result<f64> {
            if point[0] > 1.5 {
                return Err(GridError::OutOfDomain {
                    dimension: 0,
                    value: point[0],
                    lower: 0.0,
                    upper: 1.5,
                });
            }
            Ok(point[0] + 10.0 * point[1])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn degree(&self) -> usize {
            1
        }

        fn name(&self) -> &str {
            "sum"
        }
    }

    #[test]
    fn test_flatten_orders_points_by_column() {
        let x1 = array![[0.0, 1.0, 2.0], [0.0, 1.0, 2.0]];
        let x2 = array![[5.0, 5.0, 5.0], [6.0, 6.0, 6.0]];
        let y = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        let samples = flatten(x1.view(), x2.view(), y.view(), IndexOrder::Reference).unwrap();
        assert_eq!(samples.len(), 6);
        assert_eq!(samples.point(0).to_vec(), vec![0.0, 5.0]);
        assert_eq!(samples.point(1).to_vec(), vec![0.0, 6.0]);
        assert_eq!(samples.point(2).to_vec(), vec![1.0, 5.0]);
        assert_eq!(samples.values().to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let samples = flatten(x1.view(), x2.view(), y.view(), IndexOrder::Aligned).unwrap();
        assert_eq!(samples.values().to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_flatten_reference_transposes_square_grid() {
        let axis = Axis::new(vec![0.0, 1.0, 2.0]).unwrap();
        let grid = Grid::meshgrid(&axis, &axis, Indexing::Xy);
        let y = grid.sample(|p| p[0] + 10.0 * p[1]);

        let samples = flatten(grid.x1.view(), grid.x2.view(), y.view(), IndexOrder::Reference)
            .unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let k = i * 3 + j;
                assert_eq!(samples.value(k), y[[i, j]]);
                assert_eq!(samples.point(k).to_vec(), vec![grid.x1[[j, i]], grid.x2[[j, i]]]);
            }
        }
    }

    #[test]
    fn test_flatten_shape_mismatch() {
        let x1 = Array2::<f64>::zeros((2, 3));
        let x2 = Array2::<f64>::zeros((2, 3));
        let y = Array2::<f64>::zeros((3, 2));
        let result = flatten(x1.view(), x2.view(), y.view(), IndexOrder::Reference);
        assert!(matches!(result, Err(GridError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_regrid_inverts_flatten() {
        let x1 = Array2::from_shape_fn((3, 4), |(_, c)| c as f64);
        let x2 = Array2::from_shape_fn((3, 4), |(r, _)| r as f64);
        let y = Array2::from_shape_fn((3, 4), |(r, c)| (r * 7 + c * 3) as f64 * 0.5);

        for order in [IndexOrder::Reference, IndexOrder::Aligned] {
            let samples = flatten(x1.view(), x2.view(), y.view(), order).unwrap();
            assert_eq!(regrid(&samples, (3, 4), order).unwrap(), y);
        }

        let samples = flatten(x1.view(), x2.view(), y.view(), IndexOrder::Reference).unwrap();
        assert!(regrid(&samples, (4, 4), IndexOrder::Reference).is_err());
    }

    #[test]
    fn test_evaluate_onto_grid_uses_direct_indexing() {
        let x1 = array![[0.0, 1.0], [0.0, 1.0]];
        let x2 = array![[0.0, 0.0], [1.0, 1.0]];
        let mut out = Array2::from_elem((2, 2), -7.0);

        let substituted =
            evaluate_onto_grid(&SumModel, x1.view(), x2.view(), out.view_mut(), EvalErrorPolicy::Abort)
                .unwrap();
        assert_eq!(substituted, 0);
        assert_eq!(out, array![[0.0, 1.0], [10.0, 11.0]]);
    }

    #[test]
    fn test_evaluate_onto_grid_error_policies() {
        let x1 = array![[0.0, 2.0], [0.0, 1.0]];
        let x2 = array![[0.0, 0.0], [1.0, 1.0]];

        let mut out = Array2::from_elem((2, 2), -7.0);
        let err = evaluate_onto_grid(&SumModel, x1.view(), x2.view(), out.view_mut(), EvalErrorPolicy::Abort)
            .unwrap_err();
        assert!(matches!(err, GridError::OutOfDomain { value, .. } if value == 2.0));
        // Partial write before the failing cell
        assert_eq!(out[[0, 0]], 0.0);
        assert_eq!(out[[1, 1]], -7.0);

        let mut out = Array2::from_elem((2, 2), -7.0);
        let substituted =
            evaluate_onto_grid(&SumModel, x1.view(), x2.view(), out.view_mut(), EvalErrorPolicy::Nan)
                .unwrap();
        assert_eq!(substituted, 1);
        assert!(out[[0, 1]].is_nan());
        assert_eq!(out[[1, 1]], 11.0);
    }

    #[test]
    fn test_evaluate_onto_grid_checks_shape_before_writing() {
        let x1 = Array2::<f64>::zeros((2, 2));
        let x2 = Array2::<f64>::zeros((2, 2));
        let mut out = Array2::from_elem((2, 3), -7.0);

        let result =
            evaluate_onto_grid(&SumModel, x1.view(), x2.view(), out.view_mut(), EvalErrorPolicy::Abort);
        assert!(matches!(result, Err(GridError::ShapeMismatch { .. })));
        assert!(out.iter().all(|&v| v == -7.0));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("aligned".parse::<IndexOrder>().unwrap(), IndexOrder::Aligned);
        assert_eq!("NaN".parse::<EvalErrorPolicy>().unwrap(), EvalErrorPolicy::Nan);
        assert!("skip".parse::<EvalErrorPolicy>().is_err());
    }
}
