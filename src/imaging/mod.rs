//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed) |
//! | **Resize** | `imageops::resize` with `CatmullRom` |
//! | **Filters** | per-pixel maps over `RgbaImage` |
//! | **Encode** | `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: pure channel arithmetic and the store policy (unit testable)
//! - **Filters**: the [`Filter`] registry plus the per-pixel filters
//! - **Mosaic** / **Blend**: the two filters with parameters
//! - **Resize**: source → fixed-size working raster
//! - **Backend**: [`ImageBackend`] trait + [`PngBackend`]

pub mod backend;
pub mod blend;
mod calculations;
pub mod filters;
pub mod mosaic;
pub mod png_backend;
pub mod resize;

pub use backend::{BackendError, ImageBackend};
pub use blend::{ColorParseError, Rgb, decode_hex};
pub use filters::{Filter, FilterKind, GrayAlpha16Image, Tint, standard_filters};
pub use mosaic::{EdgeDivisor, MosaicParams};
pub use png_backend::PngBackend;
pub use resize::{TargetSize, resize_to_target};
