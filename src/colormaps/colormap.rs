//! Colormap trait and the gradient backed implementation.

use colorgrad::{CustomGradient, Gradient};

use crate::error::{GridError, Result};

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Colormap sampled from a continuous gradient
pub struct GradientColormap {
    name: &'static str,
    gradient: Gradient,
}

impl GradientColormap {
    pub fn new(name: &'static str, gradient: Gradient) -> Self {
        Self { name, gradient }
    }

    /// Blue to red through light grey, the diverging map used for surfaces
    pub fn coolwarm() -> Result<Self> {
        let gradient = CustomGradient::new()
            .html_colors(&["#3b4cc0", "#dddddd", "#b40426"])
            .build()
            .map_err(|e| GridError::ImageGeneration {
                message: format!("Failed to build coolwarm gradient: {}", e),
            })?;
        Ok(Self::new("coolwarm", gradient))
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        self.gradient.at(value.clamp(0.0, 1.0)).to_rgba8()
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Names accepted by [`get_colormap`]
pub const COLORMAP_NAMES: &[&str] = &["coolwarm", "viridis", "plasma", "inferno", "magma", "rdbu"];

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    let colormap = match name.to_lowercase().as_str() {
        "coolwarm" => GradientColormap::coolwarm()?,
        "viridis" => GradientColormap::new("viridis", colorgrad::viridis()),
        "plasma" => GradientColormap::new("plasma", colorgrad::plasma()),
        "inferno" => GradientColormap::new("inferno", colorgrad::inferno()),
        "magma" => GradientColormap::new("magma", colorgrad::magma()),
        "rdbu" => GradientColormap::new("rdbu", colorgrad::rd_bu()),
        _ => {
            return Err(GridError::InvalidParameter {
                param: "colormap".to_string(),
                message: format!("Unknown colormap: {}", name),
            })
        }
    };
    Ok(Box::new(colormap))
}
