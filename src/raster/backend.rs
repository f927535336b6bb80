//! Raster backend trait and shared error type.
//!
//! The [`RasterBackend`] trait defines the four pixel operations the
//! compositor needs: decode, cover-fit scaling, alpha compositing, and
//! JPEG encoding.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust over the
//! `image` crate, statically linked into the binary.

use super::params::Quality;
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for raster pixel backends.
///
/// Every backend must implement all four operations so the compositor is
/// backend-agnostic: tests swap in a recording mock to assert layer order
/// without touching pixels.
pub trait RasterBackend: Sync {
    /// Decode a raster file into RGBA pixels.
    fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Scale preserving aspect ratio so the result exactly fills
    /// `width`x`height`, cropping excess centered. Never letterboxes,
    /// never distorts.
    fn scale_cover_fit(&self, raster: &RgbaImage, width: u32, height: u32) -> RgbaImage;

    /// Blend `layer` over `base` at the origin using the layer's own
    /// alpha channel.
    fn composite_alpha(&self, base: &mut RgbaImage, layer: &RgbaImage);

    /// Encode to JPEG bytes at the given quality.
    fn encode_jpeg(&self, raster: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use image::Rgba;
    use std::sync::Mutex;

    /// Mock backend that records operations and fabricates pixels.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub decode_results: Mutex<Vec<RgbaImage>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        ScaleCoverFit { width: u32, height: u32 },
        CompositeAlpha,
        EncodeJpeg { quality: u32 },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue rasters to hand out on successive `decode` calls (LIFO).
        pub fn with_rasters(rasters: Vec<RgbaImage>) -> Self {
            Self {
                decode_results: Mutex::new(rasters),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Convenience: a solid raster of the given size and color.
        pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
            RgbaImage::from_pixel(width, height, Rgba(rgba))
        }
    }

    impl RasterBackend for MockBackend {
        fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(path.to_string_lossy().to_string()));

            self.decode_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock raster queued".to_string()))
        }

        fn scale_cover_fit(&self, raster: &RgbaImage, width: u32, height: u32) -> RgbaImage {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::ScaleCoverFit { width, height });

            // Fabricated result: target-sized fill of the source's corner pixel
            let fill = *raster.get_pixel(0, 0);
            RgbaImage::from_pixel(width, height, fill)
        }

        fn composite_alpha(&self, base: &mut RgbaImage, layer: &RgbaImage) {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::CompositeAlpha);

            for (x, y, px) in layer.enumerate_pixels() {
                if px.0[3] > 0 && x < base.width() && y < base.height() {
                    base.put_pixel(x, y, *px);
                }
            }
        }

        fn encode_jpeg(
            &self,
            raster: &RgbaImage,
            quality: Quality,
        ) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::EncodeJpeg {
                quality: quality.value(),
            });

            Ok(format!("mock-jpeg:{}x{}:q{}", raster.width(), raster.height(), quality.value())
                .into_bytes())
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockBackend::with_rasters(vec![MockBackend::solid(8, 8, [255, 0, 0, 255])]);

        let raster = backend.decode(Path::new("/test/background.jpg")).unwrap();
        assert_eq!(raster.dimensions(), (8, 8));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Decode(p) if p == "/test/background.jpg"));
    }

    #[test]
    fn mock_decode_without_queued_raster_errors() {
        let backend = MockBackend::new();
        assert!(backend.decode(Path::new("/missing.jpg")).is_err());
    }

    #[test]
    fn mock_scale_produces_target_dimensions() {
        let backend = MockBackend::new();
        let src = MockBackend::solid(10, 20, [1, 2, 3, 255]);

        let scaled = backend.scale_cover_fit(&src, 120, 63);
        assert_eq!(scaled.dimensions(), (120, 63));
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::ScaleCoverFit {
                width: 120,
                height: 63
            }
        ));
    }

    #[test]
    fn mock_composite_skips_transparent_pixels() {
        let backend = MockBackend::new();
        let mut base = MockBackend::solid(2, 2, [0, 0, 0, 255]);
        let mut layer = MockBackend::solid(2, 2, [255, 255, 255, 255]);
        layer.put_pixel(0, 0, Rgba([9, 9, 9, 0]));

        backend.composite_alpha(&mut base, &layer);
        assert_eq!(base.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(base.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn mock_encode_is_deterministic() {
        let backend = MockBackend::new();
        let raster = MockBackend::solid(4, 4, [0, 0, 0, 255]);

        let a = backend.encode_jpeg(&raster, Quality::new(90)).unwrap();
        let b = backend.encode_jpeg(&raster, Quality::new(90)).unwrap();
        assert_eq!(a, b);
    }
}
