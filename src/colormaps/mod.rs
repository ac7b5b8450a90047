//! Colormap implementations for image generation.
//!
//! This module provides matplotlib-inspired colormaps for visualizing grids.

pub mod colormap;

pub use colormap::{get_colormap, Colormap, GradientColormap, COLORMAP_NAMES};
