//! Text layout: word wrapping and run placement for a target canvas.
//!
//! Produces positioned glyph runs, one per wrapped line. Wrapping happens
//! at word boundaries inside the text-safe region (the canvas inset by a
//! configurable fraction per edge); the wrapped block is centered
//! vertically within the region and each line is centered horizontally.
//!
//! A word wider than the whole region is hard-truncated with an ellipsis
//! marker rather than split mid-character. Layout never inspects pixels,
//! only [`Typeface`] metrics, so identical inputs always produce
//! identical runs.

use crate::typeface::Typeface;

/// Marker appended when a word or block is hard-truncated.
pub const ELLIPSIS: char = '…';

/// One positioned line of text. `(x, y)` is the top-left corner of the
/// line box in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Tunables for text placement. Stock values mirror the global defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Glyph size in pixels.
    pub px: f32,
    /// Line advance as a multiple of the face's line height.
    pub line_spacing: f32,
    /// Text-safe inset per edge, as a fraction of the canvas dimension.
    pub inset: f32,
    /// Cap on wrapped lines; excess lines are dropped with an ellipsis.
    pub max_lines: Option<usize>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            px: 64.0,
            line_spacing: 1.25,
            inset: 0.12,
            max_lines: None,
        }
    }
}

/// Wrap and position `text` for a `canvas` of `(width, height)` pixels.
///
/// Empty (or whitespace-only) text yields an empty run list.
pub fn layout_text(
    text: &str,
    canvas: (u32, u32),
    face: &dyn Typeface,
    params: &LayoutParams,
) -> Vec<GlyphRun> {
    let (canvas_w, canvas_h) = (canvas.0 as f32, canvas.1 as f32);
    let inset_x = canvas_w * params.inset;
    let inset_y = canvas_h * params.inset;
    let region_w = (canvas_w - 2.0 * inset_x).max(0.0);
    let region_h = (canvas_h - 2.0 * inset_y).max(0.0);

    let mut lines = wrap_words(text, region_w, face, params.px);
    if let Some(max) = params.max_lines
        && lines.len() > max
    {
        lines.truncate(max);
        if let Some(last) = lines.pop() {
            lines.push(append_ellipsis(&last, region_w, face, params.px));
        }
    }

    if lines.is_empty() {
        return Vec::new();
    }

    let line_h = face.line_height(params.px);
    let advance = line_h * params.line_spacing;
    let block_h = line_h + (lines.len() as f32 - 1.0) * advance;
    // Centered in the safe region; pinned to the region top if taller
    let y0 = inset_y + ((region_h - block_h) / 2.0).max(0.0);

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let line_w = face.measure(&line, params.px);
            GlyphRun {
                x: inset_x + ((region_w - line_w) / 2.0).max(0.0),
                y: y0 + i as f32 * advance,
                text: line,
            }
        })
        .collect()
}

/// Greedy word-boundary wrapping into lines no wider than `max_width`.
fn wrap_words(text: &str, max_width: f32, face: &dyn Typeface, px: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if face.measure(&candidate, px) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if face.measure(word, px) <= max_width {
            current = word.to_string();
        } else {
            // A single word wider than the region: hard-truncate it
            lines.push(truncate_to_width(word, max_width, face, px));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Longest prefix of `word` that fits in `max_width` with the ellipsis
/// marker appended. Degenerates to the bare marker when nothing fits.
fn truncate_to_width(word: &str, max_width: f32, face: &dyn Typeface, px: f32) -> String {
    let mut kept = String::new();
    let mut best = ELLIPSIS.to_string();

    for ch in word.chars() {
        kept.push(ch);
        let candidate = format!("{kept}{ELLIPSIS}");
        if face.measure(&candidate, px) <= max_width {
            best = candidate;
        } else {
            break;
        }
    }
    best
}

/// Append the ellipsis marker to a truncated block's final line,
/// re-truncating if the marker pushes it past the region width.
fn append_ellipsis(line: &str, max_width: f32, face: &dyn Typeface, px: f32) -> String {
    let candidate = format!("{line}{ELLIPSIS}");
    if face.measure(&candidate, px) <= max_width {
        candidate
    } else {
        truncate_to_width(line, max_width, face, px)
    }
}
