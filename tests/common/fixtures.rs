//! Fixture models and grids.

use gridspline::{Axis, Grid, GridError, Indexing, Model, Result};

/// A model that returns zero everywhere
#[derive(Debug)]
pub struct ZeroModel;

impl Model for ZeroModel {
    fn evaluate(&self, _point: &[f64]) -> Result<f64> {
        Ok(0.0)
    }

    fn dimension(&self) -> usize {
        2
    }

    fn degree(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "zero"
    }
}

/// A model returning `x0 - x1` that fails outside `[-limit, limit]^2`
#[derive(Debug)]
pub struct BoundedModel {
    pub limit: f64,
}

impl Model for BoundedModel {
    fn evaluate(&self, point: &[f64]) -> Result<f64> {
        for (dimension, &value) in point.iter().enumerate() {
            if value.abs() > self.limit {
                return Err(GridError::OutOfDomain {
                    dimension,
                    value,
                    lower: -self.limit,
                    upper: self.limit,
                });
            }
        }
        Ok(point[0] - point[1])
    }

    fn dimension(&self) -> usize {
        2
    }

    fn degree(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "bounded"
    }
}

/// `xy` grid spanned by two explicit axes
pub fn grid_from(x1: &[f64], x2: &[f64]) -> Grid {
    let x1 = Axis::new(x1.to_vec()).expect("valid x1 axis");
    let x2 = Axis::new(x2.to_vec()).expect("valid x2 axis");
    Grid::meshgrid(&x1, &x2, Indexing::Xy)
}
