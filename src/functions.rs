//! Reference fields sampled on the grid.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GridError;

/// Scalar functions of a two-dimensional point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceFunction {
    /// `x0 * x1`
    Product,
    /// `sqrt(x0^2 + x1^2)`
    #[default]
    Radial,
}

impl ReferenceFunction {
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        match self {
            ReferenceFunction::Product => point[0] * point[1],
            ReferenceFunction::Radial => point[0].hypot(point[1]),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ReferenceFunction::Product => "product",
            ReferenceFunction::Radial => "radial",
        }
    }
}

impl FromStr for ReferenceFunction {
    type Err = GridError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "product" => Ok(ReferenceFunction::Product),
            "radial" => Ok(ReferenceFunction::Radial),
            _ => Err(GridError::InvalidParameter {
                param: "function".to_string(),
                message: format!("Unknown reference function: {}", s),
            }),
        }
    }
}
