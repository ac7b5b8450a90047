//! End-to-end sampling, fitting and rendering run.
//!
//! A run samples the configured reference function on the configured grid,
//! flattens it, fits a model through the backend handle, evaluates the model
//! back onto the grid and compares both surfaces. Images and a JSON report are
//! written to the output directory when requested.

use chrono::{DateTime, Utc};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::backend::BackendHandle;
use crate::builder::{evaluate_onto_grid, flatten, EvalErrorPolicy, IndexOrder};
use crate::colormaps::get_colormap;
use crate::config::Config;
use crate::error::Result;
use crate::functions::ReferenceFunction;
use crate::grid::{Grid, Indexing};
use crate::logging::{
    generate_run_id, log_grid_stats, log_operation_end, log_operation_start, log_timed_operation,
};
use crate::render::{render_surface, save_png, RenderOptions};

/// File name of the rendered reference surface
pub const REFERENCE_IMAGE: &str = "reference.png";

/// File name of the rendered model surface
pub const MODEL_IMAGE: &str = "model.png";

/// File name of the run report
pub const REPORT_FILE: &str = "report.json";

/// Difference between the fitted and the reference surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    /// Largest absolute difference
    pub max_abs: f64,
    /// Root mean square difference
    pub rms: f64,
    /// Number of cells where both surfaces are finite
    pub compared_cells: usize,
}

/// Summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub function: ReferenceFunction,
    pub index_order: IndexOrder,
    pub backend: String,
    pub model: String,
    pub requested_degree: usize,
    pub fitted_degree: usize,
    /// Lengths of the first and second axis
    pub n1: usize,
    pub n2: usize,
    pub samples: usize,
    /// Cells set to NaN because their evaluation failed
    pub substituted_cells: usize,
    pub error: Option<ErrorStats>,
    #[serde(default)]
    pub images: Vec<PathBuf>,
}

/// The grid, the sampled reference surface and the fitted surface
#[derive(Debug, Clone)]
pub struct Surfaces {
    pub grid: Grid,
    pub reference: Array2<f64>,
    pub fitted: Array2<f64>,
}

/// Compare two equally shaped surfaces over the cells where both are finite
pub fn compare_surfaces(
    reference: ArrayView2<'_, f64>,
    fitted: ArrayView2<'_, f64>,
) -> Option<ErrorStats> {
    let mut max_abs: f64 = 0.0;
    let mut sum_sq = 0.0;
    let mut compared_cells = 0;

    for (&r, &f) in reference.iter().zip(fitted.iter()) {
        if r.is_finite() && f.is_finite() {
            let diff = (f - r).abs();
            max_abs = max_abs.max(diff);
            sum_sq += diff * diff;
            compared_cells += 1;
        }
    }

    (compared_cells > 0).then(|| ErrorStats {
        max_abs,
        rms: (sum_sq / compared_cells as f64).sqrt(),
        compared_cells,
    })
}

/// Sample, fit and evaluate without touching the filesystem
pub fn compute(config: &Config, backend: &BackendHandle, run_id: &str) -> Result<(Surfaces, RunReport)> {
    let function: ReferenceFunction = config.grid.function.parse()?;
    let order: IndexOrder = config.grid.index_order.parse()?;
    let policy: EvalErrorPolicy = config.model.on_error.parse()?;

    let x1 = config.grid.x1.to_axis()?;
    let x2 = config.grid.x2.to_axis()?;
    let grid = Grid::meshgrid(&x1, &x2, Indexing::Xy);
    let reference = grid.sample(|p| function.evaluate(p));
    log_grid_stats(run_id, grid.shape(), x1.bounds(), x2.bounds(), function.name());

    let samples = log_timed_operation("flatten", run_id, || {
        flatten(grid.x1.view(), grid.x2.view(), reference.view(), order)
    })?;

    let model = log_timed_operation("build_model", run_id, || {
        backend.build(&samples, config.model.degree)
    })?;

    let mut fitted = grid.result_grid();
    let substituted = log_timed_operation("evaluate_onto_grid", run_id, || {
        evaluate_onto_grid(
            model.as_ref(),
            grid.x1.view(),
            grid.x2.view(),
            fitted.view_mut(),
            policy,
        )
    })?;

    let error = compare_surfaces(reference.view(), fitted.view());
    if let Some(stats) = &error {
        info!(
            run_id = run_id,
            max_abs = stats.max_abs,
            rms = stats.rms,
            compared_cells = stats.compared_cells,
            "Fitted surface compared with reference"
        );
    }

    let report = RunReport {
        run_id: run_id.to_string(),
        generated_at: Utc::now(),
        function,
        index_order: order,
        backend: backend.name().to_string(),
        model: model.name().to_string(),
        requested_degree: config.model.degree,
        fitted_degree: model.degree(),
        n1: x1.len(),
        n2: x2.len(),
        samples: samples.len(),
        substituted_cells: substituted,
        error,
        images: Vec::new(),
    };

    Ok((
        Surfaces {
            grid,
            reference,
            fitted,
        },
        report,
    ))
}

/// Run the full pipeline and write the configured outputs
pub fn run(config: &Config, backend: &BackendHandle) -> Result<RunReport> {
    let run_id = generate_run_id();
    let start = Instant::now();
    log_operation_start("pipeline", Some(run_id.as_str()));

    let (surfaces, mut report) = compute(config, backend, &run_id)?;

    let directory = &config.output.directory;
    std::fs::create_dir_all(directory)?;

    if config.output.write_images {
        let colormap = get_colormap(&config.output.colormap)?;
        let options = RenderOptions {
            cell_size: config.output.cell_size,
            colorbar: config.output.colorbar,
        };

        for (name, surface) in [
            (REFERENCE_IMAGE, &surfaces.reference),
            (MODEL_IMAGE, &surfaces.fitted),
        ] {
            let img = render_surface(surface.view(), colormap.as_ref(), &options)?;
            let path = directory.join(name);
            save_png(&img, &path)?;
            info!(run_id = %run_id, path = %path.display(), "Surface image written");
            report.images.push(path);
        }
    }

    let report_path = directory.join(REPORT_FILE);
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    info!(run_id = %run_id, path = %report_path.display(), "Run report written");

    log_operation_end("pipeline", start, report.substituted_cells == 0);
    Ok(report)
}
