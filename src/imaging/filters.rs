//! The filter registry and the per-pixel filters.
//!
//! Every artifact except the resized base comes from a [`Filter`]: a name
//! (which becomes the artifact suffix) plus a [`FilterKind`] saying which pure
//! transform to run. The pipeline never calls a filter function directly; it
//! walks [`standard_filters`] and the named-color filters built from the
//! catalog, calling [`Filter::apply`] on each.
//!
//! ## Standard set
//!
//! | Suffix | Transform |
//! |---|---|
//! | `gray` | 16-bit luminance + alpha |
//! | `nega` | `255 - c` per colour channel |
//! | `moza` | block mosaic, see [`mosaic`](super::mosaic) |
//! | `sepia` | `R = mean(R,G,B)`, `G = 0.7G`, `B = 0.4B` |
//! | `smog` | every colour channel × 0.2 |
//! | `red` / `blue` / `green` / `sb` | [`Tint`] presets |
//!
//! Alpha passes through untouched in every filter. Channel results are stored
//! with [`store_channel`](super::calculations::store_channel).

use super::blend::{Rgb, blend_pixel};
use super::calculations::{channel_mean, luminance16, scale_channel, widen};
use super::mosaic::{MosaicParams, mosaic};
use image::{DynamicImage, ImageBuffer, LumaA, Rgba, RgbaImage};

/// 16-bit gray + alpha raster produced by the grayscale filter.
pub type GrayAlpha16Image = ImageBuffer<LumaA<u16>, Vec<u16>>;

/// A per-pixel mapping with no parameters.
pub type PixelFn = fn(Rgba<u8>) -> Rgba<u8>;

/// Directional tint: every colour channel is halved, and the boosted ones
/// get `+100` on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    /// Which of R, G, B receive the boost.
    pub boost: [bool; 3],
}

impl Tint {
    pub const RED: Tint = Tint {
        boost: [true, false, false],
    };
    pub const GREEN: Tint = Tint {
        boost: [false, true, false],
    };
    pub const BLUE: Tint = Tint {
        boost: [false, false, true],
    };
    pub const SKY_BLUE: Tint = Tint {
        boost: [false, true, true],
    };

    const SCALE: f32 = 0.5;
    const BOOST: f32 = 100.0;

    fn apply(self, px: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = px.0;
        let channel = |c: u8, boosted: bool| {
            let offset = if boosted { Self::BOOST } else { 0.0 };
            scale_channel(c, Self::SCALE, offset)
        };
        Rgba([
            channel(r, self.boost[0]),
            channel(g, self.boost[1]),
            channel(b, self.boost[2]),
            a,
        ])
    }
}

/// What a [`Filter`] does to the raster.
#[derive(Debug, Clone, Copy)]
pub enum FilterKind {
    /// RGBA → 16-bit gray + alpha.
    Grayscale,
    /// Parameterless per-pixel mapping.
    Pixel(PixelFn),
    Tint(Tint),
    Mosaic(MosaicParams),
    /// Average every pixel with a fixed color.
    Blend(Rgb),
}

/// A named transform in the registry.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Artifact suffix: `<prefix>-<name>.png`.
    pub name: String,
    pub kind: FilterKind,
}

impl Filter {
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Apply the transform. The source is only read.
    pub fn apply(&self, src: &RgbaImage) -> DynamicImage {
        match self.kind {
            FilterKind::Grayscale => DynamicImage::ImageLumaA16(grayscale(src)),
            FilterKind::Pixel(f) => DynamicImage::ImageRgba8(map_pixels(src, f)),
            FilterKind::Tint(tint) => DynamicImage::ImageRgba8(map_pixels(src, |px| tint.apply(px))),
            FilterKind::Mosaic(params) => DynamicImage::ImageRgba8(mosaic(src, params)),
            FilterKind::Blend(color) => {
                DynamicImage::ImageRgba8(map_pixels(src, |px| blend_pixel(px, color)))
            }
        }
    }
}

/// The fixed filter set, in artifact order.
pub fn standard_filters(mosaic: MosaicParams) -> Vec<Filter> {
    vec![
        Filter::new("gray", FilterKind::Grayscale),
        Filter::new("nega", FilterKind::Pixel(negative)),
        Filter::new("moza", FilterKind::Mosaic(mosaic)),
        Filter::new("sepia", FilterKind::Pixel(sepia)),
        Filter::new("smog", FilterKind::Pixel(smog)),
        Filter::new("red", FilterKind::Tint(Tint::RED)),
        Filter::new("blue", FilterKind::Tint(Tint::BLUE)),
        Filter::new("green", FilterKind::Tint(Tint::GREEN)),
        Filter::new("sb", FilterKind::Tint(Tint::SKY_BLUE)),
    ]
}

/// Build a same-bounds raster by mapping every source pixel through `f`.
pub fn map_pixels(src: &RgbaImage, f: impl Fn(Rgba<u8>) -> Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(src.width(), src.height(), |x, y| f(*src.get_pixel(x, y)))
}

pub fn grayscale(src: &RgbaImage) -> GrayAlpha16Image {
    GrayAlpha16Image::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        LumaA([luminance16(r, g, b), widen(a) as u16])
    })
}

pub fn negative(px: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    Rgba([255 - r, 255 - g, 255 - b, a])
}

pub fn sepia(px: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    Rgba([
        channel_mean(r, g, b),
        scale_channel(g, 0.7, 0.0),
        scale_channel(b, 0.4, 0.0),
        a,
    ])
}

pub fn smog(px: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    Rgba([
        scale_channel(r, 0.2, 0.0),
        scale_channel(g, 0.2, 0.0),
        scale_channel(b, 0.2, 0.0),
        a,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, solid_image};

    #[test]
    fn registry_order_matches_artifact_suffixes() {
        let names: Vec<String> = standard_filters(MosaicParams::default())
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            ["gray", "nega", "moza", "sepia", "smog", "red", "blue", "green", "sb"]
        );
    }

    #[test]
    fn every_filter_preserves_bounds_and_input() {
        let src = gradient_image(13, 7);
        let before = src.clone();
        for filter in standard_filters(MosaicParams::default()) {
            let out = filter.apply(&src);
            assert_eq!((out.width(), out.height()), (13, 7), "filter {}", filter.name);
        }
        assert_eq!(src, before);
    }

    #[test]
    fn negative_is_an_involution() {
        let src = gradient_image(32, 32);
        let twice = map_pixels(&map_pixels(&src, negative), negative);
        assert_eq!(twice, src);
    }

    #[test]
    fn negative_keeps_alpha() {
        assert_eq!(negative(Rgba([255, 0, 10, 40])), Rgba([0, 255, 245, 40]));
    }

    #[test]
    fn grayscale_is_16_bit_with_alpha() {
        let out = grayscale(&solid_image(2, 2, [255, 255, 255, 128]));
        assert_eq!(out.get_pixel(1, 1).0, [0xffff, 0x8080]);
    }

    #[test]
    fn grayscale_is_monotone_per_channel() {
        for c in 0..255u8 {
            assert!(luminance16(c, 10, 10) <= luminance16(c + 1, 10, 10));
            assert!(luminance16(10, c, 10) <= luminance16(10, c + 1, 10));
            assert!(luminance16(10, 10, c) <= luminance16(10, 10, c + 1));
        }
    }

    #[test]
    fn grayscale_preserves_brightness_ordering() {
        // Pairs ordered brighter-first by perceived luminance.
        let pairs = [
            ([0, 255, 0], [255, 0, 0]),
            ([255, 0, 0], [0, 0, 255]),
            ([200, 200, 200], [100, 100, 100]),
            ([0, 128, 0], [128, 0, 128]),
        ];
        for (bright, dark) in pairs {
            let img = RgbaImage::from_vec(
                2,
                1,
                vec![bright[0], bright[1], bright[2], 255, dark[0], dark[1], dark[2], 255],
            )
            .unwrap();
            let gray = grayscale(&img);
            assert!(gray.get_pixel(0, 0).0[0] >= gray.get_pixel(1, 0).0[0]);
        }
    }

    #[test]
    fn sepia_formula() {
        assert_eq!(sepia(Rgba([30, 61, 91, 200])), Rgba([60, 42, 36, 200]));
    }

    #[test]
    fn sepia_at_full_brightness_stays_in_range() {
        assert_eq!(sepia(Rgba([255, 255, 255, 255])), Rgba([255, 178, 102, 255]));
    }

    #[test]
    fn smog_darkens() {
        assert_eq!(smog(Rgba([255, 100, 4, 9])), Rgba([51, 20, 0, 9]));
    }

    #[test]
    fn tint_presets() {
        let px = Rgba([255, 255, 255, 77]);
        let cases = [
            (Tint::RED, [227, 127, 127]),
            (Tint::BLUE, [127, 127, 227]),
            (Tint::GREEN, [127, 227, 127]),
            (Tint::SKY_BLUE, [127, 227, 227]),
        ];
        for (tint, [r, g, b]) in cases {
            assert_eq!(tint.apply(px), Rgba([r, g, b, 77]), "{tint:?}");
        }
    }

    #[test]
    fn tint_on_black_is_pure_boost() {
        assert_eq!(Tint::RED.apply(Rgba([0, 0, 0, 255])), Rgba([100, 0, 0, 255]));
    }

    #[test]
    fn blend_filter_with_white() {
        let filter = Filter::new("white", FilterKind::Blend(Rgb([255, 255, 255])));
        let out = filter.apply(&solid_image(3, 3, [0, 0, 0, 255])).to_rgba8();
        assert!(out.pixels().all(|p| p.0 == [127, 127, 127, 255]));
    }
}
