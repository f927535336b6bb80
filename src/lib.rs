//! # Snippet Image
//!
//! Deterministic social-share snippet images, derived from a record's text
//! and optional background photo and kept in sync with those attributes.
//! Save a publishable record and its preview image regenerates; save it
//! again unchanged and nothing happens.
//!
//! # Architecture: Policy → Compose → Persist
//!
//! A save event flows one way through three stages:
//!
//! ```text
//! 1. Policy    snapshot diff        →  regenerate? yes/no
//! 2. Compose   fill → background → overlay → text  →  JPEG bytes
//! 3. Persist   identity-keyed slot  →  reference back on the record
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Determinism**: compositing is a pure function of the attribute
//!   snapshot and the resolved config, so golden tests compare digests.
//! - **Idempotence**: the policy is a pure function over snapshots, so a
//!   no-op save is provably a no-op — no hidden framework hooks.
//! - **Testability**: every collaborator (raster backend, storage,
//!   typeface) sits behind a trait with a recording test double.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Global defaults + per-call overrides → one immutable [`RenderConfig`](config::RenderConfig) |
//! | [`layout`] | Word wrapping and run placement inside the text-safe region |
//! | [`compose`] | Layer blending and JPEG encoding |
//! | [`policy`] | Pure regeneration decision over attribute snapshots |
//! | [`lifecycle`] | Save-event orchestration, per-record locking, slot keys |
//! | [`record`] | [`SnippetSource`](record::SnippetSource) seam: attribute extraction hooks |
//! | [`ledger`] | Persisted last-rendered snapshots for restart-safe no-ops |
//! | [`raster`] | Pure-Rust pixel operations: decode, cover-fit, composite, encode |
//! | [`storage`] | Atomic put/get/delete behind the [`Storage`](storage::Storage) trait |
//! | [`typeface`] | Typeface resource: measurement and glyph drawing |
//!
//! # Design Decisions
//!
//! ## Explicit Snapshots Over Persistence Hooks
//!
//! Change detection is a snapshot diff handed to a pure function, not an
//! ORM lifecycle callback. The [`ledger`] persists the snapshot that
//! produced each stored image, so "nothing changed" remains answerable
//! after a restart without re-rendering everything once.
//!
//! ## Pure-Rust Imaging (No ImageMagick, No System Codecs)
//!
//! The [`raster`] module uses the `image` crate (Lanczos3 resampling,
//! JPEG codec) and [`typeface`] uses `rusttype` for glyph rasterization —
//! all pure Rust. No system dependencies, no version drift between
//! environments, and crucially: byte-identical output everywhere, which
//! the golden-test strategy depends on.
//!
//! ## Identity-Keyed Storage Slots
//!
//! Slot keys hash the record identity and snippet type, never the image
//! content. Regenerating writes over the same slot, so storage holds at
//! most one image per record per snippet type and references stay stable
//! across regenerations.
//!
//! ## Un-publishing Never Deletes
//!
//! A record leaving the publishable state keeps its stored image; only
//! the regeneration gate closes. Deleting is a separate explicit
//! [`Storage::delete`](storage::Storage::delete) call, so a publish →
//! draft → publish round trip costs zero renders.

pub mod compose;
pub mod config;
pub mod layout;
pub mod ledger;
pub mod lifecycle;
pub mod policy;
pub mod raster;
pub mod record;
pub mod storage;
pub mod typeface;

pub use compose::{CompositeImage, RenderError, render};
pub use config::{
    ConfigError, DEFAULT_SNIPPET_TYPE, Defaults, OverlayOverride, RenderConfig, RenderOverrides,
};
pub use layout::{GlyphRun, LayoutParams, layout_text};
pub use lifecycle::{SaveOutcome, SnippetError, SnippetImages, slot_key};
pub use policy::should_regenerate;
pub use raster::{Quality, RasterBackend, RustBackend, SnippetFormat};
pub use record::{Snapshot, SnippetSource};
pub use storage::{DiskStorage, Storage, StorageError};
pub use typeface::{TrueTypeFace, Typeface, TypefaceError};
