//! Interpolation backends.
//!
//! A [`Backend`] turns a [`SampleSet`] and a polynomial degree into a fitted
//! [`Model`]. Both steps are fallible and their errors are surfaced to the
//! caller unchanged. Backends are obtained by name through
//! [`BackendHandle::acquire`], which owns the backend for the duration of a run.

pub mod common;
pub mod constant;
pub mod tensor;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::sample::SampleSet;

/// A fitted model that can be evaluated at arbitrary points
pub trait Model: fmt::Debug {
    /// Evaluate the model at a point with one coordinate per sample dimension
    fn evaluate(&self, point: &[f64]) -> Result<f64>;

    /// Dimension of the points the model accepts
    fn dimension(&self) -> usize;

    /// Polynomial degree actually used by the model
    fn degree(&self) -> usize;

    /// Get the name of this model kind
    fn name(&self) -> &str;
}

/// Trait for interpolation backends
pub trait Backend: fmt::Debug {
    /// Fit a model through the samples with the requested polynomial degree
    fn build(&self, samples: &SampleSet, degree: usize) -> Result<Box<dyn Model>>;

    /// Get the name of this backend
    fn name(&self) -> &str;
}

/// How a model treats coordinates outside the sampled bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    /// Fail with an out-of-domain error
    #[default]
    Error,
    /// Project the coordinate onto the nearest bound
    Clamp,
    /// Continue the boundary polynomial past the bounds
    Extend,
}

impl FromStr for Extrapolation {
    type Err = GridError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Extrapolation::Error),
            "clamp" => Ok(Extrapolation::Clamp),
            "extend" => Ok(Extrapolation::Extend),
            _ => Err(GridError::InvalidParameter {
                param: "extrapolation".to_string(),
                message: format!("Unknown extrapolation policy: {}", s),
            }),
        }
    }
}

/// Names accepted by [`get_backend`]
pub const BACKEND_NAMES: &[&str] = &["tensor"];

/// Get a backend by name
pub fn get_backend(name: &str, extrapolation: Extrapolation) -> Result<Box<dyn Backend>> {
    match name.to_lowercase().as_str() {
        "tensor" => Ok(Box::new(tensor::TensorBackend::new(extrapolation))),
        _ => Err(GridError::BackendUnavailable {
            name: name.to_string(),
            message: format!(
                "no backend registered under this name (available: {})",
                BACKEND_NAMES.join(", ")
            ),
        }),
    }
}

/// Scoped ownership of a backend.
///
/// The handle is acquired once, passed explicitly to the code that builds
/// models, and released when dropped.
#[derive(Debug)]
pub struct BackendHandle {
    backend: Box<dyn Backend>,
}

impl BackendHandle {
    /// Look up a registered backend by name
    pub fn acquire(name: &str, extrapolation: Extrapolation) -> Result<Self> {
        let backend = get_backend(name, extrapolation)?;
        debug!(backend = backend.name(), ?extrapolation, "Backend acquired");
        Ok(Self { backend })
    }

    /// Wrap a backend that was constructed by the caller
    pub fn from_backend(backend: Box<dyn Backend>) -> Self {
        debug!(backend = backend.name(), "Backend acquired");
        Self { backend }
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// Fit a model through the samples
    pub fn build(&self, samples: &SampleSet, degree: usize) -> Result<Box<dyn Model>> {
        self.backend.build(samples, degree)
    }
}

impl Drop for BackendHandle {
    fn drop(&mut self) {
        debug!(backend = self.backend.name(), "Backend released");
    }
}
