//! Integration tests for the grid sample builder.
//!
//! These tests exercise flattening, re-gridding and evaluation against
//! fixture models and the built-in tensor backend.

mod common;

use common::assertions::{assert_approx_eq, assert_grid_approx_eq};
use common::fixtures::{grid_from, BoundedModel, ZeroModel};
use gridspline::{
    evaluate_onto_grid, flatten, regrid, BackendHandle, EvalErrorPolicy, Extrapolation,
    GridError, IndexOrder, ReferenceFunction,
};
use ndarray::Array2;
use pretty_assertions::assert_eq;

#[test]
fn test_flatten_length_is_product_of_axis_lengths() {
    for (n1, n2) in [(1, 1), (1, 4), (4, 1), (3, 3), (5, 2), (2, 7)] {
        let x1: Vec<f64> = (0..n1).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..n2).map(|i| i as f64 * 0.5).collect();
        let grid = grid_from(&x1, &x2);
        let y = grid.sample(|p| p[0] + p[1]);

        for order in [IndexOrder::Reference, IndexOrder::Aligned] {
            let samples = flatten(grid.x1.view(), grid.x2.view(), y.view(), order).unwrap();
            assert_eq!(samples.len(), n1 * n2, "n1 = {}, n2 = {}", n1, n2);
            assert_eq!(samples.dimension(), 2);
        }
    }
}

#[test]
fn test_regrid_reconstructs_value_grid_exactly() {
    let grid = grid_from(&[-2.0, -0.5, 1.0, 4.0], &[0.0, 0.1, 0.2]);
    let y = grid.sample(|p| (p[0] * 3.0 + p[1]).cos());

    for order in [IndexOrder::Reference, IndexOrder::Aligned] {
        let samples = flatten(grid.x1.view(), grid.x2.view(), y.view(), order).unwrap();
        let rebuilt = regrid(&samples, grid.shape(), order).unwrap();
        assert_eq!(rebuilt, y);
    }
}

#[test]
fn test_product_scenario_on_three_point_axes() {
    let axis = [-1.0, 0.0, 1.0];
    let grid = grid_from(&axis, &axis);
    let y = grid.sample(|p| ReferenceFunction::Product.evaluate(p));

    let samples = flatten(grid.x1.view(), grid.x2.view(), y.view(), IndexOrder::Reference).unwrap();
    assert_eq!(samples.len(), 9);

    let value_at = |a: f64, b: f64| {
        samples
            .iter()
            .find(|(p, _)| p[0] == a && p[1] == b)
            .map(|(_, v)| v)
            .expect("grid point present")
    };

    assert_eq!(value_at(1.0, 1.0), 1.0);
    assert_eq!(value_at(-1.0, 1.0), -1.0);
    for b in axis {
        assert_eq!(value_at(0.0, b), 0.0);
    }
}

#[test]
fn test_degenerate_single_row_and_column() {
    let row = grid_from(&[0.0, 1.0, 2.0, 3.0], &[5.0]);
    let y = row.sample(|p| p[0]);
    let samples = flatten(row.x1.view(), row.x2.view(), y.view(), IndexOrder::Reference).unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples.values().to_vec(), vec![0.0, 1.0, 2.0, 3.0]);

    let column = grid_from(&[5.0], &[0.0, 1.0, 2.0]);
    let y = column.sample(|p| p[1]);
    let samples =
        flatten(column.x1.view(), column.x2.view(), y.view(), IndexOrder::Reference).unwrap();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples.values().to_vec(), vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_zero_model_yields_zero_grid() {
    let grid = grid_from(&[-3.0, 8.0], &[0.5, 100.0]);
    let mut out = Array2::from_elem(grid.shape(), 42.0);

    evaluate_onto_grid(
        &ZeroModel,
        grid.x1.view(),
        grid.x2.view(),
        out.view_mut(),
        EvalErrorPolicy::Abort,
    )
    .unwrap();

    assert_eq!(out, Array2::<f64>::zeros((2, 2)));
}

#[test]
fn test_evaluate_onto_grid_keeps_shape_and_is_idempotent() {
    let grid = grid_from(&[0.0, 0.5, 1.0, 1.5, 2.0], &[-1.0, 0.0, 1.0]);
    let y = grid.sample(|p| p[0] * p[0] - p[1]);
    let samples = flatten(grid.x1.view(), grid.x2.view(), y.view(), IndexOrder::Aligned).unwrap();

    let backend = BackendHandle::acquire("tensor", Extrapolation::Error).unwrap();
    let model = backend.build(&samples, 3).unwrap();

    let mut first = grid.result_grid();
    let mut second = grid.result_grid();
    for out in [&mut first, &mut second] {
        evaluate_onto_grid(
            model.as_ref(),
            grid.x1.view(),
            grid.x2.view(),
            out.view_mut(),
            EvalErrorPolicy::Abort,
        )
        .unwrap();
    }

    assert_eq!(first.dim(), grid.shape());
    assert_eq!(first, second);
    // Aligned samples put every value back in its own cell
    assert_grid_approx_eq(first.view(), y.view(), None);
}

#[test]
fn test_fitted_model_between_nodes() {
    let grid = grid_from(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0]);
    let y = grid.sample(|p| ReferenceFunction::Product.evaluate(p));
    let samples = flatten(grid.x1.view(), grid.x2.view(), y.view(), IndexOrder::Reference).unwrap();

    let backend = BackendHandle::acquire("tensor", Extrapolation::Error).unwrap();
    let model = backend.build(&samples, 1).unwrap();

    assert_approx_eq(model.evaluate(&[1.5, 2.5]).unwrap(), 3.75, None);
    assert!(matches!(
        model.evaluate(&[3.5, 0.0]),
        Err(GridError::OutOfDomain { dimension: 0, .. })
    ));
}

#[test]
fn test_model_errors_propagate_unchanged() {
    let grid = grid_from(&[-1.0, 0.0, 3.0], &[0.0, 1.0]);
    let model = BoundedModel { limit: 2.0 };

    let mut out = grid.result_grid();
    let err = evaluate_onto_grid(
        &model,
        grid.x1.view(),
        grid.x2.view(),
        out.view_mut(),
        EvalErrorPolicy::Abort,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GridError::OutOfDomain { dimension: 0, value, .. } if value == 3.0
    ));

    let mut out = grid.result_grid();
    let substituted = evaluate_onto_grid(
        &model,
        grid.x1.view(),
        grid.x2.view(),
        out.view_mut(),
        EvalErrorPolicy::Nan,
    )
    .unwrap();
    assert_eq!(substituted, 2);
    assert_eq!(out[[1, 0]], -2.0);
    assert!(out[[0, 2]].is_nan() && out[[1, 2]].is_nan());
}
