//! Tensor-grid interpolation backend.
//!
//! The samples must cover a complete tensor grid: the Cartesian product of
//! the distinct coordinates found along each dimension. Evaluation combines
//! one local Lagrange stencil of `degree + 1` nodes per dimension, so the
//! model passes through every sample and reproduces polynomials of the
//! fitted degree exactly.
//!
//! Degenerate input is reduced the way a spline fit would need it:
//! - if all values are equal the result is a [`ConstantModel`];
//! - the degree is capped by the number of distinct values minus one;
//! - dimensions with a single distinct coordinate are dropped and ignored
//!   on evaluation;
//! - each remaining dimension uses at most `nodes - 1` as its degree.

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use super::common::{clamp_coordinate, lagrange_weights, stencil_start};
use super::constant::ConstantModel;
use super::{Backend, Extrapolation, Model};
use crate::error::{GridError, Result};
use crate::sample::SampleSet;

/// Highest polynomial degree accepted by the tensor backend
pub const MAX_DEGREE: usize = 5;

/// Tensor-grid backend
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorBackend {
    extrapolation: Extrapolation,
}

impl TensorBackend {
    pub fn new(extrapolation: Extrapolation) -> Self {
        Self { extrapolation }
    }
}

/// One model dimension with its distinct, sorted node coordinates
#[derive(Debug, Clone, PartialEq)]
struct NodeAxis {
    dimension: usize,
    degree: usize,
    nodes: Vec<f64>,
}

impl NodeAxis {
    fn bounds(&self) -> (f64, f64) {
        (self.nodes[0], self.nodes[self.nodes.len() - 1])
    }

    fn position(&self, x: f64) -> Option<usize> {
        // Nodes hold +0.0 for both signed zeros
        let x = x + 0.0;
        self.nodes.binary_search_by(|n| n.total_cmp(&x)).ok()
    }
}

impl Backend for TensorBackend {
    fn build(&self, samples: &SampleSet, degree: usize) -> Result<Box<dyn Model>> {
        if samples.is_empty() {
            return Err(GridError::construction("sample set is empty"));
        }
        if degree > MAX_DEGREE {
            return Err(GridError::construction(format!(
                "unsupported degree {} (maximum is {})",
                degree, MAX_DEGREE
            )));
        }
        if samples.values().iter().any(|v| !v.is_finite()) {
            return Err(GridError::construction("sample values must be finite"));
        }
        if samples.points().iter().any(|v| !v.is_finite()) {
            return Err(GridError::construction("sample coordinates must be finite"));
        }

        let dimension = samples.dimension();

        // Two distinct values are enough to rule out a constant model
        let unique_values = samples.count_unique_values((degree + 1).max(2));
        if unique_values == 1 {
            debug!(samples = samples.len(), "All sample values equal, using constant model");
            return Ok(Box::new(ConstantModel::new(samples.value(0), dimension)));
        }
        let degree = degree.min(unique_values - 1);

        let axes: Vec<NodeAxis> = (0..dimension)
            .filter_map(|d| {
                let nodes = samples.unique_coordinates(d);
                (nodes.len() >= 2).then(|| NodeAxis {
                    dimension: d,
                    degree: degree.min(nodes.len() - 1),
                    nodes,
                })
            })
            .collect();

        if axes.is_empty() {
            return Err(GridError::construction(
                "need at least 2 unique coordinates in at least one dimension",
            ));
        }

        let shape: Vec<usize> = axes.iter().map(|a| a.nodes.len()).collect();
        let total = shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .filter(|&total| total <= samples.len())
            .ok_or_else(|| {
                GridError::construction(format!(
                    "{} samples cannot cover a tensor grid of shape {:?}",
                    samples.len(),
                    shape
                ))
            })?;

        let mut values = ArrayD::from_elem(IxDyn(&shape), f64::NAN);
        let mut filled = ArrayD::from_elem(IxDyn(&shape), false);
        let mut index = vec![0usize; axes.len()];

        for (point, value) in samples.iter() {
            for (slot, axis) in index.iter_mut().zip(&axes) {
                // Every coordinate was collected into the axis nodes above
                *slot = axis.position(point[axis.dimension]).ok_or_else(|| {
                    GridError::construction("sample coordinate missing from node list")
                })?;
            }
            let cell = &index[..];
            if filled[cell] && values[cell] != value {
                return Err(GridError::construction(format!(
                    "conflicting values {} and {} at node {:?}",
                    values[cell],
                    value,
                    point.to_vec()
                )));
            }
            values[cell] = value;
            filled[cell] = true;
        }

        let covered = filled.iter().filter(|&&f| f).count();
        if covered != total {
            return Err(GridError::construction(format!(
                "samples cover {} of {} tensor grid nodes",
                covered, total
            )));
        }

        debug!(
            dimension,
            active_dimensions = axes.len(),
            degree,
            nodes = total,
            "Tensor model built"
        );

        Ok(Box::new(TensorModel {
            dimension,
            degree,
            axes,
            values,
            extrapolation: self.extrapolation,
        }))
    }

    fn name(&self) -> &str {
        "tensor"
    }
}

/// Local Lagrange interpolation over a complete tensor grid
#[derive(Debug, Clone)]
pub struct TensorModel {
    dimension: usize,
    degree: usize,
    axes: Vec<NodeAxis>,
    values: ArrayD<f64>,
    extrapolation: Extrapolation,
}

impl TensorModel {
    /// Sample dimensions that take part in the interpolation
    pub fn active_dimensions(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.dimension).collect()
    }
}

impl Model for TensorModel {
    fn evaluate(&self, point: &[f64]) -> Result<f64> {
        if point.len() != self.dimension {
            return Err(GridError::Evaluation {
                message: format!(
                    "Dimension mismatch: point has {} coordinates but the model expects {}",
                    point.len(),
                    self.dimension
                ),
            });
        }
        if let Some(d) = point.iter().position(|v| !v.is_finite()) {
            return Err(GridError::Evaluation {
                message: format!("non-finite coordinate {} in dimension {}", point[d], d),
            });
        }

        let mut stencils: Vec<(usize, Vec<f64>)> = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            let mut x = point[axis.dimension];
            let (lower, upper) = axis.bounds();
            if x < lower || x > upper {
                match self.extrapolation {
                    Extrapolation::Error => {
                        return Err(GridError::OutOfDomain {
                            dimension: axis.dimension,
                            value: x,
                            lower,
                            upper,
                        })
                    }
                    Extrapolation::Clamp => x = clamp_coordinate(x, lower, upper),
                    Extrapolation::Extend => {}
                }
            }
            let start = stencil_start(&axis.nodes, x, axis.degree);
            let weights = lagrange_weights(&axis.nodes[start..=start + axis.degree], x);
            stencils.push((start, weights));
        }

        // Walk the tensor product of all stencils
        let mut offsets = vec![0usize; stencils.len()];
        let mut index = vec![0usize; stencils.len()];
        let mut sum = 0.0;
        loop {
            let mut weight = 1.0;
            for (a, (start, weights)) in stencils.iter().enumerate() {
                index[a] = start + offsets[a];
                weight *= weights[offsets[a]];
            }
            if weight != 0.0 {
                sum += weight * self.values[&index[..]];
            }

            let mut a = 0;
            loop {
                if a == stencils.len() {
                    return Ok(sum);
                }
                offsets[a] += 1;
                if offsets[a] < stencils[a].1.len() {
                    break;
                }
                offsets[a] = 0;
                a += 1;
            }
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn degree(&self) -> usize {
        self.degree
    }

    fn name(&self) -> &str {
        "tensor"
    }
}
