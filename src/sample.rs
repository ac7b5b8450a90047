//! Flat `(point, value)` datasets consumed by interpolation backends.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{GridError, Result};

/// A sequence of sample points with one scalar value each.
///
/// Points are stored row-wise in an `n x dim` matrix; row `k` of `points`
/// and element `k` of `values` describe the same sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    points: Array2<f64>,
    values: Array1<f64>,
}

impl SampleSet {
    /// Create a sample set from a point matrix and a co-indexed value vector
    pub fn new(points: Array2<f64>, values: Array1<f64>) -> Result<Self> {
        if points.nrows() != values.len() {
            return Err(GridError::shape(format!(
                "{} points but {} values",
                points.nrows(),
                values.len()
            )));
        }
        Ok(Self { points, values })
    }

    /// Create a sample set from row-major point coordinates
    pub fn from_flat(dimension: usize, coordinates: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if dimension == 0 {
            return Err(GridError::shape("point dimension must be at least 1"));
        }
        if coordinates.len() != dimension * values.len() {
            return Err(GridError::shape(format!(
                "{} coordinates do not describe {} points of dimension {}",
                coordinates.len(),
                values.len(),
                dimension
            )));
        }
        let points = Array2::from_shape_vec((values.len(), dimension), coordinates)
            .map_err(|e| GridError::shape(e.to_string()))?;
        Self::new(points, Array1::from(values))
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of coordinates per point
    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn point(&self, k: usize) -> ArrayView1<'_, f64> {
        self.points.row(k)
    }

    pub fn value(&self, k: usize) -> f64 {
        self.values[k]
    }

    /// Iterate over `(point, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, f64>, f64)> + '_ {
        self.points
            .outer_iter()
            .zip(self.values.iter().copied())
    }

    /// Smallest and largest coordinate along one dimension
    pub fn bounds(&self, dimension: usize) -> Option<(f64, f64)> {
        if self.is_empty() || dimension >= self.dimension() {
            return None;
        }
        let column = self.points.column(dimension);
        let lower = column.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((lower, upper))
    }

    /// Sorted distinct coordinates along one dimension.
    ///
    /// `-0.0` is reported as `0.0`.
    pub fn unique_coordinates(&self, dimension: usize) -> Vec<f64> {
        let mut coords: Vec<f64> = self.points.column(dimension).iter().map(|&v| v + 0.0).collect();
        coords.sort_by(|a, b| a.total_cmp(b));
        coords.dedup();
        coords
    }

    /// Count distinct values, stopping once `limit` have been seen
    pub fn count_unique_values(&self, limit: usize) -> usize {
        let mut seen: Vec<f64> = Vec::with_capacity(limit);
        for &v in self.values.iter() {
            if !seen.contains(&v) {
                seen.push(v);
                if seen.len() >= limit {
                    break;
                }
            }
        }
        seen.len()
    }
}
