//! Heatmap rendering of value grids.
//!
//! Each grid cell becomes a square block of pixels. Row 0 of the grid is
//! drawn at the bottom of the image so that the second coordinate grows
//! upwards, as on a surface plot seen from above.

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::colormaps::Colormap;
use crate::error::{GridError, Result};

/// Gap between the heatmap and the colour bar, in pixels
const COLORBAR_GAP: u32 = 8;

/// Width of the colour bar, in pixels
const COLORBAR_WIDTH: u32 = 24;

/// Options controlling heatmap rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Edge length of one grid cell in pixels
    pub cell_size: u32,
    /// Whether to draw a colour bar to the right of the heatmap
    pub colorbar: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: 12,
            colorbar: true,
        }
    }
}

/// Smallest and largest finite value, if any
pub fn value_range(data: ArrayView2<'_, f64>) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Render a value grid as an RGBA heatmap.
///
/// Non-finite cells are left transparent.
pub fn render_surface(
    data: ArrayView2<'_, f64>,
    colormap: &dyn Colormap,
    options: &RenderOptions,
) -> Result<RgbaImage> {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return Err(GridError::ImageGeneration {
            message: format!("Cannot render an empty {}x{} grid", rows, cols),
        });
    }
    if options.cell_size == 0 {
        return Err(GridError::ImageGeneration {
            message: "Cell size must be at least one pixel".to_string(),
        });
    }

    let too_large = || GridError::ImageGeneration {
        message: format!(
            "Image for a {}x{} grid at {} px per cell is too large",
            rows, cols, options.cell_size
        ),
    };
    let map_width = u32::try_from(cols)
        .ok()
        .and_then(|c| c.checked_mul(options.cell_size))
        .ok_or_else(too_large)?;
    let height = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(options.cell_size))
        .ok_or_else(too_large)?;
    let width = if options.colorbar {
        map_width
            .checked_add(COLORBAR_GAP + COLORBAR_WIDTH)
            .ok_or_else(too_large)?
    } else {
        map_width
    };

    let (min_val, max_val) = value_range(data).unwrap_or((0.0, 0.0));

    let mut img: RgbaImage = ImageBuffer::new(width, height);

    for ((r, c), &value) in data.indexed_iter() {
        if !value.is_finite() {
            continue;
        }
        let color = Rgba(colormap.map(value, min_val, max_val));
        let x0 = c as u32 * options.cell_size;
        let y0 = (rows - 1 - r) as u32 * options.cell_size;
        for y in y0..y0 + options.cell_size {
            for x in x0..x0 + options.cell_size {
                img.put_pixel(x, y, color);
            }
        }
    }

    if options.colorbar {
        // Largest value at the top
        for y in 0..height {
            let t = if height > 1 {
                1.0 - y as f64 / (height - 1) as f64
            } else {
                0.5
            };
            let color = Rgba(colormap.map_normalized(t));
            for x in map_width + COLORBAR_GAP..width {
                img.put_pixel(x, y, color);
            }
        }
    }

    Ok(img)
}

/// Write an image to disk as PNG
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| GridError::ImageGeneration {
            message: format!("Failed to write {}: {}", path.display(), e),
        })
}
