//! Shared test utilities: synthetic rasters and on-disk fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let red = solid_image(8, 8, [255, 0, 0, 255]);
//! let ramp = gradient_image(13, 7);
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_jpeg_fixture(&tmp.path().join("photo.jpg"), 200, 150);
//! ```

use image::{ImageBuffer, Rgb, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// In-memory rasters
// =========================================================================

/// A `width`×`height` image filled with one RGBA value.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    ImageBuffer::from_pixel(width, height, Rgba(rgba))
}

/// A deterministic ramp: red follows x, green follows y, blue mixes both,
/// alpha varies so alpha-handling bugs show up.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(2).saturating_sub(1).max(1)).min(255) as u8,
            (y * 255 / height.max(2).saturating_sub(1).max(1)).min(255) as u8,
            ((x + y) * 7 % 256) as u8,
            (255 - (x + 3 * y) % 64) as u8,
        ])
    })
}

// =========================================================================
// Fixture files
// =========================================================================

/// Write a small RGB JPEG at `path`. The extension is not consulted.
pub fn write_jpeg_fixture(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 90);
    img.write_with_encoder(encoder).unwrap();
}
