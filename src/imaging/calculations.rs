//! Pure channel arithmetic shared by every filter.
//!
//! All filter math is done in `f32` and brought back to 8 bits through
//! [`store_channel`], so every filter has the same overflow behaviour:
//!
//! | Result | Stored |
//! |---|---|
//! | `127.9` | `127` (truncated toward zero) |
//! | `300.0` | `255` (saturated) |
//! | `-4.0` | `0` (saturated) |
//! | `NaN` | `0` |
//!
//! Nothing here touches images; these functions are unit testable on plain
//! numbers.

/// Convert an `f32` channel result back to 8 bits: truncate, then saturate.
#[inline]
pub fn store_channel(value: f32) -> u8 {
    // `as` on f32 -> u8 truncates toward zero and saturates at the bounds.
    value as u8
}

/// `channel * factor + offset`, stored with [`store_channel`].
#[inline]
pub fn scale_channel(channel: u8, factor: f32, offset: f32) -> u8 {
    store_channel(f32::from(channel) * factor + offset)
}

/// Midpoint of two channel values, `(a + b) * 0.5`, truncated.
#[inline]
pub fn blend_channel(channel: u8, with: u8) -> u8 {
    store_channel((f32::from(channel) + f32::from(with)) * 0.5)
}

/// Mean of the three colour channels.
#[inline]
pub fn channel_mean(r: u8, g: u8, b: u8) -> u8 {
    store_channel((f32::from(r) + f32::from(g) + f32::from(b)) / 3.0)
}

/// Widen an 8-bit channel to 16 bits (`0xab` → `0xabab`).
#[inline]
pub fn widen(channel: u8) -> u32 {
    u32::from(channel) * 0x101
}

/// Luminance of an RGB triple as a 16-bit gray value.
///
/// Uses the ITU-R 601 weights (0.299, 0.587, 0.114) in 16.16 fixed point on
/// 16-bit-widened channels, rounded to nearest.
pub fn luminance16(r: u8, g: u8, b: u8) -> u16 {
    let y = (19595 * widen(r) + 38470 * widen(g) + 7471 * widen(b) + (1 << 15)) >> 16;
    // Weights sum to 65536, so y <= 0xffff.
    y as u16
}

/// Half-width of a mosaic block: the distance from a block's center sample
/// to its edge.
pub fn block_radius(block: u32) -> u32 {
    block.saturating_sub(1) / 2
}

/// Centers of the mosaic blocks along one axis of `len` pixels.
///
/// A trailing block is included as long as any of its pixels is in bounds,
/// even when its center is not, so no pixel is left unwritten.
pub fn block_centers(len: u32, block: u32) -> impl Iterator<Item = u32> {
    let radius = block_radius(block);
    (radius..len + radius).step_by(block.max(1) as usize)
}
