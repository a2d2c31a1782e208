//! Resize the decoded source into the fixed-size working raster.
//!
//! The working raster always has exactly the target bounds (default
//! 128×128); aspect ratio is not preserved. Catmull-Rom blends neighbouring
//! source samples, so the same kernel serves both upscaling and downscaling.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, instrument};

/// Target bounds of the working raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
        }
    }
}

/// Scale `src` to exactly `target` with Catmull-Rom interpolation.
#[instrument(skip(src), fields(from_w = src.width(), from_h = src.height()))]
pub fn resize_to_target(src: &DynamicImage, target: TargetSize) -> RgbaImage {
    let rgba = src.to_rgba8();
    let resized = imageops::resize(&rgba, target.width, target.height, FilterType::CatmullRom);
    debug!(
        width = resized.width(),
        height = resized.height(),
        "Resize complete"
    );
    resized
}
