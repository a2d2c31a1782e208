//! Block mosaic (pixelation).
//!
//! The raster is tiled with `block × block` squares whose centers sit at
//! `(block-1)/2, (block-1)/2 + block, ...` on both axes. Each square is
//! flattened to the average R, G, B of its in-bounds pixels.
//!
//! ```text
//! block = 5, width = 12
//!
//!   x: 0 1 2 3 4 5 6 7 8 9 10 11 | 12 13 14
//!      [----c----] [----c----] [--c-- (out of bounds)
//! ```
//!
//! Squares on the right and bottom edges can stick out of the raster. With
//! [`EdgeDivisor::Block`] (the default) their sum is still divided by
//! `block²`, so edge squares come out darker than the pixels they cover.
//! [`EdgeDivisor::Samples`] divides by the number of pixels actually summed.
//!
//! Block centers continue up to `len + radius`, so a trailing partial block
//! is always written and no pixel is left at zero when the raster side is
//! not a multiple of `block`.
//!
//! Alpha is not averaged: every pixel of a square gets the alpha of the last
//! in-bounds pixel visited (row-major), i.e. the bottom-right in-bounds one.

use super::calculations::{block_centers, block_radius, store_channel};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// How the sum of an edge block is turned into an average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDivisor {
    /// Always divide by `block²`.
    #[default]
    Block,
    /// Divide by the count of in-bounds pixels.
    Samples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicParams {
    /// Side length of a square; odd and at least 1.
    pub block: u32,
    pub divisor: EdgeDivisor,
}

impl Default for MosaicParams {
    fn default() -> Self {
        Self {
            block: 5,
            divisor: EdgeDivisor::Block,
        }
    }
}

/// Pixelate `src` into a new raster of the same bounds.
pub fn mosaic(src: &RgbaImage, params: MosaicParams) -> RgbaImage {
    let (width, height) = src.dimensions();
    let mut dest = RgbaImage::new(width, height);
    let radius = block_radius(params.block);

    for cy in block_centers(height, params.block) {
        let rows = cy.saturating_sub(radius)..(cy + radius + 1).min(height);
        for cx in block_centers(width, params.block) {
            let cols = cx.saturating_sub(radius)..(cx + radius + 1).min(width);

            let mut sum = [0f32; 3];
            let mut samples = 0u32;
            let mut alpha = 0u8;
            for y in rows.clone() {
                for x in cols.clone() {
                    let [r, g, b, a] = src.get_pixel(x, y).0;
                    sum[0] += f32::from(r);
                    sum[1] += f32::from(g);
                    sum[2] += f32::from(b);
                    alpha = a;
                    samples += 1;
                }
            }

            let divisor = match params.divisor {
                EdgeDivisor::Block => (params.block as f32).powi(2),
                EdgeDivisor::Samples => samples.max(1) as f32,
            };
            let color = Rgba([
                store_channel(sum[0] / divisor),
                store_channel(sum[1] / divisor),
                store_channel(sum[2] / divisor),
                alpha,
            ]);

            for y in rows.clone() {
                for x in cols.clone() {
                    dest.put_pixel(x, y, color);
                }
            }
        }
    }

    dest
}
