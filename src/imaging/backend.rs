//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two places the pipeline touches the
//! filesystem: decoding the source image and writing each artifact. Filters
//! never see a path.
//!
//! The production implementation is
//! [`PngBackend`](super::png_backend::PngBackend): any format the `image`
//! crate can decode in, PNG out.

use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Trait for image I/O backends.
///
/// `Sync` so a backend can be shared with rayon workers.
pub trait ImageBackend: Sync {
    /// Read and decode a source image.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` and persist it at `path`.
    fn write(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError>;
}
