//! Sample axes and rectangular coordinate grids.
//!
//! An [`Axis`] is a strictly increasing list of coordinates. Two axes span a
//! [`Grid`], stored as a pair of equally shaped coordinate arrays in the
//! same layout `meshgrid` produces.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{GridError, Result};

/// Largest number of coordinates an axis may hold
pub const MAX_AXIS_LEN: usize = 1 << 24;

/// A strictly increasing sequence of sample coordinates along one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    values: Vec<f64>,
}

impl Axis {
    /// Create an axis from explicit coordinates.
    ///
    /// Fails if the list is empty, contains non-finite values, or is not
    /// strictly increasing.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(GridError::InvalidAxis {
                message: "axis must contain at least one coordinate".to_string(),
            });
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(GridError::InvalidAxis {
                message: format!("non-finite coordinate at position {}", pos),
            });
        }

        if let Some(pos) = values.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::InvalidAxis {
                message: format!(
                    "coordinates must be strictly increasing: {} followed by {} at position {}",
                    values[pos],
                    values[pos + 1],
                    pos + 1
                ),
            });
        }

        Ok(Self { values })
    }

    /// Evenly spaced coordinates in the half-open interval `[start, stop)`.
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(GridError::InvalidAxis {
                message: format!("step must be positive and finite, got {}", step),
            });
        }
        if !(start.is_finite() && stop.is_finite()) {
            return Err(GridError::InvalidAxis {
                message: format!("bounds must be finite, got [{}, {})", start, stop),
            });
        }

        // Same length rule as numpy's arange
        let count = ((stop - start) / step).ceil().max(0.0);
        if !(count <= MAX_AXIS_LEN as f64) {
            return Err(GridError::InvalidAxis {
                message: format!(
                    "[{}, {}) with step {} gives more than {} coordinates",
                    start, stop, step, MAX_AXIS_LEN
                ),
            });
        }
        let count = count as usize;
        let values = (0..count).map(|i| start + i as f64 * step).collect();
        Self::new(values)
    }

    /// Number of coordinates
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Axes are never empty; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Smallest and largest coordinate
    pub fn bounds(&self) -> (f64, f64) {
        (self.values[0], self.values[self.values.len() - 1])
    }
}

/// Memory layout of a two-axis meshgrid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indexing {
    /// Cartesian layout: shape `(N2, N1)`, the first axis runs along columns
    #[default]
    Xy,
    /// Matrix layout: shape `(N1, N2)`, the first axis runs along rows
    Ij,
}

impl FromStr for Indexing {
    type Err = GridError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xy" => Ok(Indexing::Xy),
            "ij" => Ok(Indexing::Ij),
            _ => Err(GridError::InvalidParameter {
                param: "indexing".to_string(),
                message: format!("Unknown grid indexing: {}", s),
            }),
        }
    }
}

/// Cartesian product of two axes as a pair of coordinate arrays
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// First coordinate of every cell
    pub x1: Array2<f64>,
    /// Second coordinate of every cell
    pub x2: Array2<f64>,
    indexing: Indexing,
}

impl Grid {
    /// Build the coordinate arrays spanned by two axes.
    pub fn meshgrid(x1: &Axis, x2: &Axis, indexing: Indexing) -> Self {
        let (n1, n2) = (x1.len(), x2.len());

        let (c1, c2) = match indexing {
            Indexing::Xy => (
                Array2::from_shape_fn((n2, n1), |(_, c)| x1.values[c]),
                Array2::from_shape_fn((n2, n1), |(r, _)| x2.values[r]),
            ),
            Indexing::Ij => (
                Array2::from_shape_fn((n1, n2), |(r, _)| x1.values[r]),
                Array2::from_shape_fn((n1, n2), |(_, c)| x2.values[c]),
            ),
        };

        Self {
            x1: c1,
            x2: c2,
            indexing,
        }
    }

    /// Shape shared by both coordinate arrays
    pub fn shape(&self) -> (usize, usize) {
        self.x1.dim()
    }

    pub fn indexing(&self) -> Indexing {
        self.indexing
    }

    /// Evaluate a scalar field at every cell, keeping the grid's layout.
    pub fn sample<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(&[f64]) -> f64,
    {
        Array2::from_shape_fn(self.shape(), |idx| f(&[self.x1[idx], self.x2[idx]]))
    }

    /// Allocate an output grid with the same shape, filled with NaN.
    ///
    /// NaN marks cells that have not been written by an evaluation pass.
    pub fn result_grid(&self) -> Array2<f64> {
        Array2::from_elem(self.shape(), f64::NAN)
    }
}
