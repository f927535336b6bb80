//! Typeface resource: measurement and glyph drawing.
//!
//! The [`Typeface`] trait is the seam between text layout (which only
//! measures) and the compositor (which draws). The production
//! implementation is [`TrueTypeFace`] over `rusttype`; it is loaded once
//! and shared read-only across renders.
//!
//! Coordinates handed to [`Typeface::draw_run`] are the top-left corner of
//! the line box; the implementation converts to a baseline internally.

use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypefaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Font parse failed: {0}")]
    Parse(String),
}

/// Measuring and drawing interface over a loaded typeface.
///
/// `measure` and `draw_run` must agree: a run drawn at `x` occupies
/// exactly `measure(text, px)` horizontal pixels of advance. Layout relies
/// on this to center lines.
pub trait Typeface: Send + Sync {
    /// Total advance width of `text` at `px` pixels.
    fn measure(&self, text: &str, px: f32) -> f32;

    /// Height of a single line box at `px` pixels.
    fn line_height(&self, px: f32) -> f32;

    /// Draw `text` with the line box's top-left corner at `(x, y)`,
    /// alpha-blending glyph coverage with `color` over existing pixels.
    fn draw_run(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        px: f32,
        color: Rgba<u8>,
    );
}

/// A TrueType/OpenType face parsed by `rusttype`.
pub struct TrueTypeFace {
    font: Font<'static>,
}

impl TrueTypeFace {
    /// Parse a face from raw font bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TypefaceError> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            TypefaceError::Parse("not a valid TrueType/OpenType font".to_string())
        })?;
        Ok(Self { font })
    }

    /// Read and parse a face from a font file.
    pub fn load(path: &Path) -> Result<Self, TypefaceError> {
        Self::from_bytes(std::fs::read(path)?)
    }
}

impl Typeface for TrueTypeFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        let scale = Scale::uniform(px);
        text.chars()
            .map(|ch| self.font.glyph(ch).scaled(scale).h_metrics().advance_width)
            .sum()
    }

    fn line_height(&self, px: f32) -> f32 {
        let v = self.font.v_metrics(Scale::uniform(px));
        v.ascent - v.descent + v.line_gap
    }

    fn draw_run(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        px: f32,
        color: Rgba<u8>,
    ) {
        let scale = Scale::uniform(px);
        let v_metrics = self.font.v_metrics(scale);
        let baseline_y = y + v_metrics.ascent;
        let mut caret_x = x;

        for ch in text.chars() {
            let glyph = self
                .font
                .glyph(ch)
                .scaled(scale)
                .positioned(point(caret_x, baseline_y));

            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let px_x = gx as i32 + bb.min.x;
                    let px_y = gy as i32 + bb.min.y;
                    if px_x < 0 || px_y < 0 {
                        return;
                    }
                    let (px_x, px_y) = (px_x as u32, px_y as u32);
                    if px_x >= canvas.width() || px_y >= canvas.height() {
                        return;
                    }
                    blend_coverage(canvas.get_pixel_mut(px_x, px_y), color, coverage);
                });
            }

            caret_x += glyph.unpositioned().h_metrics().advance_width;
        }
    }
}

/// Blend `color` over `dst` weighted by glyph coverage (0.0–1.0).
fn blend_coverage(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    if coverage <= 0.0 {
        return;
    }
    let alpha = coverage.min(1.0);
    let inv = 1.0 - alpha;
    dst.0[0] = (color.0[0] as f32 * alpha + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (color.0[1] as f32 * alpha + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (color.0[2] as f32 * alpha + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = 255;
}
