//! # tintlab
//!
//! A batch image filter pipeline. One source image goes in; a fixed set of
//! stylised PNG variants comes out, plus one color-blended variant per entry
//! in a color catalog.
//!
//! # Architecture
//!
//! ```text
//! source ──decode──▶ resize (128×128) ──▶ base + 9 standard filters ──▶ PNG files
//!                                     └──▶ catalog colors (blend)    ──▶ PNG files
//! ```
//!
//! Filters are pure functions from the working raster to a new image. All
//! I/O sits behind [`imaging::ImageBackend`], and all color lookups behind
//! [`catalog::ColorCatalog`], so the pipeline can be tested without touching
//! the filesystem or the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Runs decode → resize → filters → writes and reports what it did |
//! | [`imaging`] | Resize, the filter registry, per-pixel filters, PNG backend |
//! | [`catalog`] | Named-color sources: static list or scraped HTML color table |
//! | [`config`] | `tintlab.toml` loading, stock defaults, merging, validation |
//! | [`naming`] | Output path convention `O.png` / `O-<suffix>.png` |
//! | [`output`] | CLI progress and summary formatting |
//!
//! # Design Decisions
//!
//! ## One Store Policy
//!
//! Every filter computes in floating point and stores through a single
//! conversion: truncate toward zero, then saturate to `0..=255`. Filters that
//! would agree on paper therefore agree on disk too.
//!
//! ## 16-bit Grayscale
//!
//! The `gray` artifact is written as 16-bit gray+alpha. The other artifacts
//! are 8-bit RGBA.
//!
//! ## Catalog Failures Are Not Fatal
//!
//! A catalog that cannot be reached or parsed yields no entries. The standard
//! set is still written and the run still succeeds.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_helpers;
