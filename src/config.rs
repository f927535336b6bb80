//! Snippet rendering configuration.
//!
//! Global defaults live in a `snippet-image.toml` file (or the stock
//! values below); each render resolves those defaults together with
//! per-call overrides into one immutable [`RenderConfig`]. There is no
//! ambient mutable state: whatever the compositor sees was fixed at
//! resolve time.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! size = [1200, 630]        # Canvas in pixels (the Open Graph default)
//! fill = "#333333"          # Base fill when no background photo is supplied
//! quality = 90              # JPEG quality (1-100)
//!
//! [overlay]
//! # path = "overlay.png"    # Branding layer composited above the background
//!
//! [text]
//! color = "#ffffff"         # Glyph color
//! size = 64.0               # Glyph size in pixels
//! line_spacing = 1.25       # Line advance as a multiple of line height
//! inset = 0.12              # Text-safe inset per edge (fraction of canvas)
//! # max_lines = 3           # Cap on wrapped lines
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use crate::layout::LayoutParams;
use crate::raster::Quality;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Snippet type every record answers for unless told otherwise.
pub const DEFAULT_SNIPPET_TYPE: &str = "default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Global rendering defaults loaded from `snippet-image.toml`.
///
/// All fields have stock values. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    /// Canvas geometry, base fill, and encoding quality.
    pub canvas: CanvasConfig,
    /// Default overlay layer.
    pub overlay: OverlayConfig,
    /// Typography settings for the text layer.
    pub text: TextConfig,
}

/// Canvas geometry and encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Canvas size as `[width, height]` in pixels.
    pub size: [u32; 2],
    /// Base fill color used when no background photo is supplied.
    pub fill: String,
    /// JPEG encoding quality (1-100).
    pub quality: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: [1200, 630],
            fill: "#333333".to_string(),
            quality: 90,
        }
    }
}

/// Default overlay layer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Raster composited above the background on every snippet.
    /// Absent means no overlay unless a call supplies one.
    pub path: Option<PathBuf>,
}

/// Typography settings for the text layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Glyph color.
    pub color: String,
    /// Glyph size in pixels.
    pub size: f32,
    /// Line advance as a multiple of the face's line height.
    pub line_spacing: f32,
    /// Text-safe inset per edge, as a fraction of the canvas dimension.
    pub inset: f32,
    /// Cap on wrapped lines; absent means unlimited.
    pub max_lines: Option<usize>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            size: 64.0,
            line_spacing: 1.25,
            inset: 0.12,
            max_lines: None,
        }
    }
}

/// Per-call overrides, merged over [`Defaults`] by [`Defaults::resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOverrides {
    /// Canvas size replacing the default.
    pub size: Option<(u32, u32)>,
    /// Overlay handling for this render.
    pub overlay: OverlayOverride,
    /// Line cap replacing the default.
    pub max_lines: Option<usize>,
}

/// Whether a render keeps, drops, or replaces the default overlay.
/// Disabling is explicit: `Disabled` suppresses the layer even when the
/// defaults name one.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverlayOverride {
    #[default]
    Inherit,
    Disabled,
    Path(PathBuf),
}

/// Fully resolved configuration for one render.
///
/// Built fresh per render from [`Defaults::resolve`]; never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub canvas: (u32, u32),
    pub overlay: Option<PathBuf>,
    /// Selects which attribute-extraction rules the record applies;
    /// extraction itself lives in the record, not here.
    pub snippet_type: String,
    pub background_fill: Rgba<u8>,
    pub text_color: Rgba<u8>,
    pub layout: LayoutParams,
    pub quality: Quality,
}

impl Defaults {
    /// Load defaults from a TOML file and validate them.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let defaults: Self = toml::from_str(&content)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.size[0] == 0 || self.canvas.size[1] == 0 {
            return Err(ConfigError::Validation(
                "canvas.size dimensions must be positive".into(),
            ));
        }
        if self.canvas.quality == 0 || self.canvas.quality > 100 {
            return Err(ConfigError::Validation(
                "canvas.quality must be 1-100".into(),
            ));
        }
        if !(self.text.inset >= 0.0 && self.text.inset < 0.5) {
            return Err(ConfigError::Validation(
                "text.inset must be in [0.0, 0.5)".into(),
            ));
        }
        if self.text.size <= 0.0 {
            return Err(ConfigError::Validation("text.size must be positive".into()));
        }
        if self.text.line_spacing <= 0.0 {
            return Err(ConfigError::Validation(
                "text.line_spacing must be positive".into(),
            ));
        }
        parse_hex_color(&self.canvas.fill)?;
        parse_hex_color(&self.text.color)?;
        Ok(())
    }

    /// Merge these defaults with per-call overrides into one immutable
    /// [`RenderConfig`], override precedence winning.
    pub fn resolve(
        &self,
        snippet_type: &str,
        overrides: &RenderOverrides,
    ) -> Result<RenderConfig, ConfigError> {
        self.validate()?;

        let canvas = overrides
            .size
            .unwrap_or((self.canvas.size[0], self.canvas.size[1]));
        if canvas.0 == 0 || canvas.1 == 0 {
            return Err(ConfigError::Validation(
                "canvas dimensions must be positive".into(),
            ));
        }

        let overlay = match &overrides.overlay {
            OverlayOverride::Inherit => self.overlay.path.clone(),
            OverlayOverride::Disabled => None,
            OverlayOverride::Path(path) => Some(path.clone()),
        };

        Ok(RenderConfig {
            canvas,
            overlay,
            snippet_type: snippet_type.to_string(),
            background_fill: parse_hex_color(&self.canvas.fill)?,
            text_color: parse_hex_color(&self.text.color)?,
            layout: LayoutParams {
                px: self.text.size,
                line_spacing: self.text.line_spacing,
                inset: self.text.inset,
                max_lines: overrides.max_lines.or(self.text.max_lines),
            },
            quality: Quality::new(self.canvas.quality),
        })
    }
}

/// Parse a `#rrggbb` color string into opaque RGBA.
pub(crate) fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ConfigError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Validation(format!("invalid color: {s}")));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| ConfigError::Validation(format!("invalid color: {s}")))
    };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

/// The stock config as a documented TOML string (for `gen-config`).
pub fn stock_config_toml() -> &'static str {
    r##"# snippet-image configuration
# All options are optional - defaults shown below.

[canvas]
size = [1200, 630]        # Canvas in pixels (the Open Graph default)
fill = "#333333"          # Base fill when no background photo is supplied
quality = 90              # JPEG quality (1-100)

[overlay]
# path = "overlay.png"    # Branding layer composited above the background

[text]
color = "#ffffff"         # Glyph color
size = 64.0               # Glyph size in pixels
line_spacing = 1.25       # Line advance as a multiple of line height
inset = 0.12              # Text-safe inset per edge (fraction of canvas)
# max_lines = 3           # Cap on wrapped lines
"##
}
