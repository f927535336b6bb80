//! Parameter types shared between the compositor and the raster backend.
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on
//!   construction so a backend never sees an out-of-range value.
//! - [`SnippetFormat`] — Encoded output format of a finished snippet image.

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoded format of a finished snippet image.
///
/// JPEG is the only format generated today; the enum keeps storage keys and
/// encode dispatch honest about what they are handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetFormat {
    Jpeg,
}

impl SnippetFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            SnippetFormat::Jpeg => "jpg",
        }
    }
}
