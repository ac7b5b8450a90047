//! Common utilities for interpolation backends.
//!
//! This module provides node lookup and local polynomial weights shared by
//! the grid based models.

/// Find the interval `k` with `nodes[k] <= x < nodes[k + 1]`, clamped to the
/// first and last interval. `nodes` must be sorted and hold at least two values.
pub fn locate(nodes: &[f64], x: f64) -> usize {
    let last = nodes.len() - 2;
    if x <= nodes[0] {
        return 0;
    }
    if x >= nodes[last + 1] {
        return last;
    }
    // First node strictly greater than x, minus one
    nodes.partition_point(|&n| n <= x).saturating_sub(1).min(last)
}

/// Index of the node closest to `x`; ties go to the lower node
pub fn nearest_index(nodes: &[f64], x: f64) -> usize {
    if nodes.len() == 1 {
        return 0;
    }
    let k = locate(nodes, x);
    if (x - nodes[k]).abs() <= (nodes[k + 1] - x).abs() {
        k
    } else {
        k + 1
    }
}

/// First node of the `degree + 1` node stencil used around `x`.
///
/// The stencil is centred on the interval containing `x` and shifted inwards
/// near the ends so that it always fits inside `nodes`.
pub fn stencil_start(nodes: &[f64], x: f64, degree: usize) -> usize {
    if degree == 0 {
        return nearest_index(nodes, x);
    }
    let k = locate(nodes, x);
    let start = k.saturating_sub((degree - 1) / 2);
    start.min(nodes.len() - (degree + 1))
}

/// Lagrange basis weights of the nodes in `stencil` at `x`
pub fn lagrange_weights(stencil: &[f64], x: f64) -> Vec<f64> {
    stencil
        .iter()
        .enumerate()
        .map(|(m, &xm)| {
            stencil
                .iter()
                .enumerate()
                .filter(|&(l, _)| l != m)
                .map(|(_, &xl)| (x - xl) / (xm - xl))
                .product()
        })
        .collect()
}

/// Clamp a coordinate to `[lower, upper]`
pub fn clamp_coordinate(x: f64, lower: f64, upper: f64) -> f64 {
    x.max(lower).min(upper)
}
