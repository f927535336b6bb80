//! Regeneration policy: decides when a snippet image must be rebuilt.
//!
//! A pure function over attribute snapshots — no I/O, no clock, no
//! framework lifecycle hooks. The lifecycle manager feeds it the previous
//! and current [`Snapshot`] plus whether a derived image already exists;
//! everything else follows from the return value.

use crate::record::Snapshot;

/// Decide whether a render must run for this save.
///
/// Regenerate if and only if the record is publishable AND (no image
/// exists yet OR `text`/`background` differ from the previous snapshot).
/// An untracked previous snapshot (`None`) counts as differing: we cannot
/// prove the existing image is current, so it is rebuilt once.
///
/// When the record is not publishable the answer is `false`
/// unconditionally — an existing image is left in place so un-publishing
/// does not destroy it. Deletion is a separate, explicit operation.
pub fn should_regenerate(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    has_existing_image: bool,
) -> bool {
    if !current.publishable {
        return false;
    }
    if !has_existing_image {
        return true;
    }
    match previous {
        Some(prev) => prev.text != current.text || prev.background != current.background,
        None => true,
    }
}
