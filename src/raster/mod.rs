//! Raster operations — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image` crate (JPEG, PNG) |
//! | **Cover-fit** | Lanczos3 resize + centered crop |
//! | **Alpha composite** | `image::imageops::overlay` |
//! | **Encode → JPEG** | `image::codecs::jpeg` at fixed quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for cover-fit geometry (unit testable)
//! - **Parameters**: [`Quality`] and [`SnippetFormat`]
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, RasterBackend};
pub use calculations::{calculate_cover_dimensions, centered_crop_origin};
pub use params::{Quality, SnippetFormat};
pub use rust_backend::RustBackend;
