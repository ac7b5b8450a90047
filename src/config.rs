//! Configuration management for gridspline.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::{Extrapolation, BACKEND_NAMES};
use crate::backend::tensor::MAX_DEGREE;
use crate::builder::{EvalErrorPolicy, IndexOrder};
use crate::colormaps::COLORMAP_NAMES;
use crate::error::{GridError, Result};
use crate::functions::ReferenceFunction;
use crate::grid::Axis;

/// Command-line arguments for gridspline
#[derive(Parser, Debug, Default)]
#[command(name = "gridspline")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, env = "GRIDSPLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interpolation backend to fit the samples with
    #[arg(short, long, env = "GRIDSPLINE_BACKEND")]
    pub backend: Option<String>,

    /// Polynomial degree requested from the backend
    #[arg(short, long, env = "GRIDSPLINE_DEGREE")]
    pub degree: Option<usize>,

    /// Reference function sampled on the grid (product, radial)
    #[arg(short, long, env = "GRIDSPLINE_FUNCTION")]
    pub function: Option<String>,

    /// Directory for images and the run report
    #[arg(short, long, env = "GRIDSPLINE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Colormap used for the rendered surfaces
    #[arg(long, env = "GRIDSPLINE_COLORMAP")]
    pub colormap: Option<String>,

    /// Skip writing PNG images
    #[arg(long)]
    pub no_images: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GRIDSPLINE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Half-open coordinate range `[start, stop)` sampled every `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl AxisSpec {
    /// Materialize the axis
    pub fn to_axis(&self) -> Result<Axis> {
        Axis::arange(self.start, self.stop, self.step)
    }
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            start: -5.0,
            stop: 5.0,
            step: 0.25,
        }
    }
}

/// Grid sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// First axis
    #[serde(default)]
    pub x1: AxisSpec,

    /// Second axis
    #[serde(default)]
    pub x2: AxisSpec,

    /// Reference function name
    #[serde(default = "default_function")]
    pub function: String,

    /// Pairing of points and values when flattening
    #[serde(default = "default_index_order")]
    pub index_order: String,
}

/// Model fitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend name
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Requested polynomial degree
    #[serde(default = "default_degree")]
    pub degree: usize,

    /// Behaviour outside the sampled bounds
    #[serde(default = "default_extrapolation")]
    pub extrapolation: String,

    /// Behaviour when a grid cell fails to evaluate
    #[serde(default = "default_on_error")]
    pub on_error: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for images and the run report
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Colormap name
    #[serde(default = "default_colormap")]
    pub colormap: String,

    /// Pixels per grid cell
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,

    /// Draw a colour bar next to each surface
    #[serde(default = "default_true")]
    pub colorbar: bool,

    /// Write PNG images
    #[serde(default = "default_true")]
    pub write_images: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Grid configuration
    #[serde(default)]
    pub grid: GridConfig,

    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(backend) = args.backend {
            config.model.backend = backend;
        }
        if let Some(degree) = args.degree {
            config.model.degree = degree;
        }
        if let Some(function) = args.function {
            config.grid.function = function;
        }
        if let Some(directory) = args.output_dir {
            config.output.directory = directory;
        }
        if let Some(colormap) = args.colormap {
            config.output.colormap = colormap;
        }
        if args.no_images {
            config.output.write_images = false;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.grid = other.grid;
        self.model = other.model;
        self.output = other.output;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, spec) in [("x1", &self.grid.x1), ("x2", &self.grid.x2)] {
            spec.to_axis().map_err(|e| GridError::Config {
                message: format!("Invalid axis {}: {}", name, e),
            })?;
        }

        self.grid
            .function
            .parse::<ReferenceFunction>()
            .map_err(config_error)?;
        self.grid
            .index_order
            .parse::<IndexOrder>()
            .map_err(config_error)?;
        self.model
            .extrapolation
            .parse::<Extrapolation>()
            .map_err(config_error)?;
        self.model
            .on_error
            .parse::<EvalErrorPolicy>()
            .map_err(config_error)?;

        if !BACKEND_NAMES.contains(&self.model.backend.to_lowercase().as_str()) {
            return Err(GridError::Config {
                message: format!(
                    "Invalid backend: {}. Must be one of: {}",
                    self.model.backend,
                    BACKEND_NAMES.join(", ")
                ),
            });
        }

        if self.model.degree > MAX_DEGREE {
            return Err(GridError::Config {
                message: format!(
                    "Invalid degree: {}. Must be at most {}",
                    self.model.degree, MAX_DEGREE
                ),
            });
        }

        if !COLORMAP_NAMES.contains(&self.output.colormap.to_lowercase().as_str()) {
            return Err(GridError::Config {
                message: format!(
                    "Invalid colormap: {}. Must be one of: {}",
                    self.output.colormap,
                    COLORMAP_NAMES.join(", ")
                ),
            });
        }

        if self.output.cell_size == 0 {
            return Err(GridError::Config {
                message: "Cell size cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(GridError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

fn config_error(e: GridError) -> GridError {
    GridError::Config {
        message: e.to_string(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            model: ModelConfig::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x1: AxisSpec::default(),
            x2: AxisSpec::default(),
            function: default_function(),
            index_order: default_index_order(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            degree: default_degree(),
            extrapolation: default_extrapolation(),
            on_error: default_on_error(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            colormap: default_colormap(),
            cell_size: default_cell_size(),
            colorbar: true,
            write_images: true,
        }
    }
}

// Default value functions for serde
fn default_function() -> String {
    "radial".to_string()
}

fn default_index_order() -> String {
    "reference".to_string()
}

fn default_backend() -> String {
    "tensor".to_string()
}

fn default_degree() -> usize {
    3
}

fn default_extrapolation() -> String {
    "error".to_string()
}

fn default_on_error() -> String {
    "abort".to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_colormap() -> String {
    "coolwarm".to_string()
}

fn default_cell_size() -> u32 {
    12
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
