//! Hex color codes and the named-color blend.
//!
//! A color code is up to six hex digits (`ffb6c1`, optionally `#ffb6c1`) read
//! as a 24-bit integer `v` and split as `R = v / 65536`,
//! `G = (v % 65536) / 256`, `B = v % 256`. Short codes are therefore
//! right-aligned: `"ff"` is `(0, 0, 255)`.

use super::calculations::blend_channel;
use image::Rgba;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color code")]
    Empty,
    #[error("invalid hex digit in color code {0:?}")]
    InvalidDigit(String),
    #[error("color code {0:?} does not fit in 24 bits")]
    OutOfRange(String),
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Split a 24-bit value into channels. Bits above 24 are ignored.
    pub fn from_u24(value: u32) -> Self {
        let r = value / 65536;
        let rem = value % 65536;
        Rgb([(r & 0xff) as u8, (rem / 256) as u8, (rem % 256) as u8])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex(s)
    }
}

/// Parse a hex color code into channels.
pub fn decode_hex(code: &str) -> Result<Rgb, ColorParseError> {
    let digits = code.trim().strip_prefix('#').unwrap_or(code.trim());
    if digits.is_empty() {
        return Err(ColorParseError::Empty);
    }
    // from_str_radix accepts a leading '+', a color code does not.
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidDigit(code.to_string()));
    }
    if digits.len() > 6 {
        return Err(ColorParseError::OutOfRange(code.to_string()));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| ColorParseError::InvalidDigit(code.to_string()))?;
    Ok(Rgb::from_u24(value))
}

/// Average a pixel with `color`, keeping its alpha.
pub fn blend_pixel(px: Rgba<u8>, color: Rgb) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    let [cr, cg, cb] = color.0;
    Rgba([
        blend_channel(r, cr),
        blend_channel(g, cg),
        blend_channel(b, cb),
        a,
    ])
}
