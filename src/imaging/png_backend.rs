//! Pure Rust image backend built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader`, format sniffed from content |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Every artifact is PNG regardless of the input format. PNG keeps the 16-bit
//! gray + alpha output of the grayscale filter intact.

use super::backend::{BackendError, ImageBackend};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader};
use std::path::Path;
use tracing::instrument;

/// Decode anything `image` supports, write PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngBackend;

impl PngBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for PngBackend {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let decode_err = |source| BackendError::Decode {
            path: path.to_path_buf(),
            source,
        };
        // An unreadable source is a decode failure, not an output I/O error.
        ImageReader::open(path)
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)
    }

    fn write(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        image
            .write_with_encoder(PngEncoder::new(writer))
            .map_err(|source| BackendError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{solid_image, write_jpeg_fixture};
    use image::{GenericImageView, ImageBuffer, LumaA};

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("source.jpg");
        write_jpeg_fixture(&path, 200, 150);

        let img = PngBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn decode_sniffs_format_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mislabelled.png");
        write_jpeg_fixture(&path, 40, 30);

        let img = PngBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (40, 30));
    }

    #[test]
    fn decode_nonexistent_file_is_decode_error() {
        let result = PngBackend::new().decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = PngBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn write_png_round_trips_pixels() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("solid.png");
        let img = DynamicImage::ImageRgba8(solid_image(4, 3, [1, 2, 3, 4]));

        let backend = PngBackend::new();
        backend.write(&img, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (4, 3));
        assert!(back.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }

    #[test]
    fn write_keeps_16_bit_gray_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gray.png");
        let gray = ImageBuffer::from_pixel(2, 2, LumaA([0x1234u16, 0xffff]));

        PngBackend::new()
            .write(&DynamicImage::ImageLumaA16(gray), &path)
            .unwrap();

        let back = image::open(&path).unwrap();
        assert!(matches!(back, DynamicImage::ImageLumaA16(_)));
    }

    #[test]
    fn write_creates_missing_parent_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/out.png");
        let img = DynamicImage::ImageRgba8(solid_image(1, 1, [0, 0, 0, 255]));

        PngBackend::new().write(&img, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_into_a_file_path_fails_with_io() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let img = DynamicImage::ImageRgba8(solid_image(1, 1, [0, 0, 0, 255]));

        let result = PngBackend::new().write(&img, &blocker.join("out.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
