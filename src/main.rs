//! gridspline - sample a reference surface, fit it through an interpolation
//! backend and render both surfaces.

use anyhow::Context;
use tracing::{error, info};

use gridspline::{init_tracing, log_error, BackendHandle, Config};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    init_tracing(&config.log_level);

    info!("Starting gridspline v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let extrapolation = config.model.extrapolation.parse()?;
    let backend = BackendHandle::acquire(&config.model.backend, extrapolation).map_err(|e| {
        log_error(&e, "backend acquisition");
        e
    })?;

    let report = gridspline::run(&config, &backend).map_err(|e| {
        log_error(&e, "pipeline");
        e
    })?;

    info!(
        run_id = %report.run_id,
        samples = report.samples,
        model = %report.model,
        fitted_degree = report.fitted_degree,
        "Run finished"
    );
    if let Some(stats) = report.error {
        info!(
            "Max abs difference {:.3e}, RMS {:.3e} over {} cells",
            stats.max_abs, stats.rms, stats.compared_cells
        );
    }

    Ok(())
}
