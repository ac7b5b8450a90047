//! Constant model.
//!
//! Used when every sample carries the same value. It has no bounds, so it
//! never needs to extrapolate.

use super::Model;
use crate::error::{GridError, Result};

/// A model that evaluates to the same value everywhere
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantModel {
    value: f64,
    dimension: usize,
}

impl ConstantModel {
    pub fn new(value: f64, dimension: usize) -> Self {
        Self { value, dimension }
    }
}

impl Model for ConstantModel {
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
        Ok(self.value)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn degree(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "constant"
    }
}
