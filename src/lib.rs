//! # gridspline
//!
//! Grid sampling and model evaluation for multivariate interpolation backends.
//!
//! The crate samples a scalar field on the Cartesian product of two axes,
//! flattens the grid into the `(point, value)` list an interpolation backend
//! consumes, fits a model through a backend, evaluates the model back onto the
//! grid and renders both surfaces for comparison.
//!
//! ## Architecture
//!
//! - **Grid layer**: strictly increasing axes and `meshgrid` coordinate arrays
//! - **Builder**: `flatten`, `regrid` and `evaluate_onto_grid`
//! - **Backends**: `Backend`/`Model` traits, a scoped `BackendHandle` and the
//!   built-in tensor-grid backend
//! - **Output**: colormapped PNG heatmaps and a JSON run report

pub mod backend;
pub mod builder;
pub mod colormaps;
pub mod config;
pub mod error;
pub mod functions;
pub mod grid;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod sample;

pub use backend::{get_backend, Backend, BackendHandle, Extrapolation, Model};
pub use builder::{evaluate_onto_grid, flatten, regrid, EvalErrorPolicy, IndexOrder};
pub use config::Config;
pub use error::{GridError, Result};
pub use functions::ReferenceFunction;
pub use grid::{Axis, Grid, Indexing};
pub use logging::{
    generate_run_id, init_tracing, log_error, log_grid_stats, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use pipeline::{run, RunReport};
pub use sample::SampleSet;
