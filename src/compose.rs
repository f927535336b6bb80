//! Compositing: background → overlay → text → encoded bytes.
//!
//! The layer order is fixed. Each render starts from a solid fill, lays
//! the cover-fitted background photo over it (when the record supplies
//! one), alpha-blends the overlay raster (when configured), draws the
//! text runs last, and encodes the result to JPEG at the configured
//! quality. No disk writes happen here; the caller owns persistence.
//!
//! Pixel content is a pure function of `(attributes, config)`: identical
//! inputs produce identical bytes, which is what makes digest-based
//! golden tests possible.

use crate::config::RenderConfig;
use crate::layout::layout_text;
use crate::raster::{BackendError, RasterBackend, SnippetFormat};
use crate::record::Snapshot;
use crate::typeface::Typeface;
use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Raster backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("Degenerate canvas: {0}x{1} has zero area")]
    DegenerateCanvas(u32, u32),
    /// Surfaced by external timeout policies; the core never times out
    /// on its own.
    #[error("Render exceeded the configured time bound")]
    Timeout,
}

/// A finished snippet image: encoded bytes plus their format and the
/// canvas geometry they were rendered at.
#[derive(Debug, Clone)]
pub struct CompositeImage {
    pub bytes: Vec<u8>,
    pub format: SnippetFormat,
    pub width: u32,
    pub height: u32,
}

impl CompositeImage {
    /// Encoded byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Render one snippet image.
///
/// Fails with [`RenderError`] when a source raster cannot be decoded or
/// the canvas has zero area; the canvas check repeats what
/// [`Defaults::resolve`](crate::config::Defaults::resolve) already
/// rejects, since a hand-built config can bypass the resolver.
pub fn render(
    backend: &impl RasterBackend,
    attributes: &Snapshot,
    config: &RenderConfig,
    typeface: &dyn Typeface,
) -> Result<CompositeImage, RenderError> {
    let raster = compose(backend, attributes, config, typeface)?;
    let bytes = backend.encode_jpeg(&raster, config.quality)?;
    debug!(
        width = config.canvas.0,
        height = config.canvas.1,
        bytes = bytes.len(),
        "rendered snippet image"
    );
    Ok(CompositeImage {
        bytes,
        format: SnippetFormat::Jpeg,
        width: config.canvas.0,
        height: config.canvas.1,
    })
}

/// Composite the layers into a raw RGBA raster, pre-encode.
///
/// Split from [`render`] so pixel-level tests can assert on exact
/// positions without decoding JPEG output.
pub(crate) fn compose(
    backend: &impl RasterBackend,
    attributes: &Snapshot,
    config: &RenderConfig,
    typeface: &dyn Typeface,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = config.canvas;
    if width == 0 || height == 0 {
        return Err(RenderError::DegenerateCanvas(width, height));
    }

    let mut canvas = RgbaImage::from_pixel(width, height, config.background_fill);

    if let Some(path) = &attributes.background {
        let decoded = backend.decode(path)?;
        let fitted = backend.scale_cover_fit(&decoded, width, height);
        backend.composite_alpha(&mut canvas, &fitted);
    }

    if let Some(path) = &config.overlay {
        let decoded = backend.decode(path)?;
        let fitted = backend.scale_cover_fit(&decoded, width, height);
        backend.composite_alpha(&mut canvas, &fitted);
    }

    if !attributes.text.is_empty() {
        for run in layout_text(&attributes.text, config.canvas, typeface, &config.layout) {
            typeface.draw_run(
                &mut canvas,
                &run.text,
                run.x,
                run.y,
                config.layout.px,
                config.text_color,
            );
        }
    }

    Ok(canvas)
}
