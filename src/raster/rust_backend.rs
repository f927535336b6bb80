//! Pure Rust raster backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Cover-fit scale | `image::imageops::resize` (Lanczos3) + centered `crop_imm` |
//! | Alpha composite | `image::imageops::overlay` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at fixed quality |

use super::backend::{BackendError, RasterBackend};
use super::calculations::{calculate_cover_dimensions, centered_crop_origin};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        ImageReader::open(path)
            .map_err(BackendError::Io)?
            .decode()
            .map(|img| img.to_rgba8())
            .map_err(|e| {
                BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
            })
    }

    fn scale_cover_fit(&self, raster: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        let (cover_w, cover_h) =
            calculate_cover_dimensions(raster.dimensions(), (width, height));
        let scaled = image::imageops::resize(raster, cover_w, cover_h, FilterType::Lanczos3);
        let (origin_x, origin_y) = centered_crop_origin((cover_w, cover_h), (width, height));
        image::imageops::crop_imm(&scaled, origin_x, origin_y, width, height).to_image()
    }

    fn composite_alpha(&self, base: &mut RgbaImage, layer: &RgbaImage) {
        image::imageops::overlay(base, layer, 0, 0);
    }

    fn encode_jpeg(&self, raster: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        // JPEG carries no alpha; flatten before encoding
        let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();

        let mut bytes = Vec::new();
        let encoder =
            JpegEncoder::new_with_quality(std::io::Cursor::new(&mut bytes), quality.value() as u8);
        DynamicImage::ImageRgb8(rgb)
            .write_with_encoder(encoder)
            .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
        Ok(bytes)
    }
}
