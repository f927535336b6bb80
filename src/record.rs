//! Record seam: attribute extraction and the derived-image reference.
//!
//! The lifecycle manager never talks to a database or ORM; it sees records
//! only through [`SnippetSource`]. A record answers the extraction hooks
//! per snippet type (different snippet types may pull different fields)
//! and carries the reference to its derived image, nothing more.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable capture of a record's snippet-relevant attributes at one
/// evaluation point. Taken on every save request and compared against the
/// previously rendered snapshot for change detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Text to composite, already extracted for the active snippet type.
    pub text: String,
    /// Background raster reference, if the record supplies one.
    pub background: Option<PathBuf>,
    /// Whether the record is currently publishable.
    pub publishable: bool,
}

/// A record that can have a snippet image derived from it.
pub trait SnippetSource {
    /// Stable identity for this record. Drives the per-record render lock
    /// and the storage slot key, so it must not change across saves.
    fn identity(&self) -> &str;

    /// Text for the given snippet type. Empty means "no text layer".
    fn text_for(&self, snippet_type: &str) -> String;

    /// Background raster reference for the given snippet type.
    fn background_for(&self, snippet_type: &str) -> Option<PathBuf>;

    /// Whether the record is in a state that should have a snippet image.
    fn is_publishable(&self) -> bool;

    /// Reference to the currently stored snippet image, if any.
    fn image_reference(&self) -> Option<&str>;

    /// Record a freshly persisted snippet image reference. Called only
    /// after the bytes are durably stored.
    fn set_image_reference(&mut self, reference: String);

    /// Capture the attributes relevant to one snippet type.
    fn snapshot(&self, snippet_type: &str) -> Snapshot {
        Snapshot {
            text: self.text_for(snippet_type),
            background: self.background_for(snippet_type),
            publishable: self.is_publishable(),
        }
    }
}
