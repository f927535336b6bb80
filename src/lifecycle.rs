//! Lifecycle orchestration: from a save event to an up-to-date image.
//!
//! [`SnippetImages`] owns the collaborators (raster backend, storage,
//! typeface, global defaults) and wires one save event through the
//! pipeline: snapshot the record's attributes, ask the
//! [policy](crate::policy) whether a render is due, composite, persist,
//! and only then update the record's derived-image reference.
//!
//! ## State machine (per record)
//!
//! ```text
//! NoImage ──first qualifying save──▶ HasImage ──changed inputs──▶ HasImage (regenerated)
//!                                       │
//!                                       └──non-qualifying save──▶ HasImage (untouched)
//! ```
//!
//! There is no transition back to `NoImage`: un-publishing leaves the
//! stored image in place, and deletion is an explicit storage operation
//! outside this manager.
//!
//! ## Concurrency
//!
//! Renders are CPU-bound and stateless, so distinct records regenerate in
//! parallel ([`SnippetImages::on_save_all`] fans out with rayon). Within
//! one record, render+persist is serialized through a keyed lock table so
//! two saves can never race on the same storage slot. The lock guard is
//! held only for the critical section and released on every exit path,
//! including render failure.
//!
//! ## Failure behavior
//!
//! Any error leaves the record's existing reference unchanged: the
//! reference is written only after storage reports the bytes durable.
//! There are no retries here; retry policy belongs to the caller.

use crate::compose::{RenderError, render};
use crate::config::{ConfigError, DEFAULT_SNIPPET_TYPE, Defaults, RenderOverrides};
use crate::ledger::SnapshotLedger;
use crate::policy::should_regenerate;
use crate::raster::RasterBackend;
use crate::record::SnippetSource;
use crate::storage::{Storage, StorageError};
use crate::typeface::Typeface;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SnippetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// What one save event did.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// A fresh image was rendered and persisted under this reference.
    Regenerated(String),
    /// Nothing was due: the record was left untouched.
    Unchanged,
}

/// Orchestrates snippet image regeneration for save events.
pub struct SnippetImages<B: RasterBackend, S: Storage> {
    defaults: Defaults,
    backend: B,
    storage: S,
    typeface: Arc<dyn Typeface>,
    ledger: Mutex<SnapshotLedger>,
    /// When set, the ledger is re-saved here after every accepted render.
    ledger_dir: Option<PathBuf>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<B: RasterBackend, S: Storage> SnippetImages<B, S> {
    pub fn new(defaults: Defaults, backend: B, storage: S, typeface: Arc<dyn Typeface>) -> Self {
        Self {
            defaults,
            backend,
            storage,
            typeface,
            ledger: Mutex::new(SnapshotLedger::empty()),
            ledger_dir: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Persist the snapshot ledger in `dir`, loading whatever a previous
    /// run left there. Makes the idempotent no-op survive restarts.
    pub fn with_ledger_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.ledger = Mutex::new(SnapshotLedger::load(&dir));
        self.ledger_dir = Some(dir);
        self
    }

    /// Handle a save event with the default snippet type and no overrides.
    pub fn on_save<R: SnippetSource>(&self, record: &mut R) -> Result<SaveOutcome, SnippetError> {
        self.on_save_with(record, DEFAULT_SNIPPET_TYPE, &RenderOverrides::default())
    }

    /// Handle a save event for one snippet type with per-call overrides.
    pub fn on_save_with<R: SnippetSource>(
        &self,
        record: &mut R,
        snippet_type: &str,
        overrides: &RenderOverrides,
    ) -> Result<SaveOutcome, SnippetError> {
        let config = self.defaults.resolve(snippet_type, overrides)?;
        let current = record.snapshot(snippet_type);
        let identity = record.identity().to_string();

        // Serialize render+persist per record; the guard drops on every
        // exit path below, error returns included.
        let lock = self.lock_for(&identity);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = self
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&identity, snippet_type)
            .cloned();
        let has_existing = record.image_reference().is_some();

        if !should_regenerate(previous.as_ref(), &current, has_existing) {
            debug!(%identity, snippet_type, "snippet image is up to date");
            return Ok(SaveOutcome::Unchanged);
        }

        let image = render(&self.backend, &current, &config, self.typeface.as_ref())?;
        let key = slot_key(&identity, snippet_type);
        let reference = self.storage.put(&key, &image.bytes, image.format)?;
        record.set_image_reference(reference.clone());

        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        ledger.insert(&identity, snippet_type, current);
        if let Some(dir) = &self.ledger_dir
            && let Err(e) = ledger.save(dir)
        {
            // The image is already durable; a stale ledger only costs
            // one extra render after a restart.
            warn!(%identity, error = %e, "failed to persist snapshot ledger");
        }

        info!(%identity, snippet_type, %reference, "snippet image regenerated");
        Ok(SaveOutcome::Regenerated(reference))
    }

    /// Fan a save event out over distinct records in parallel.
    ///
    /// Outcomes are returned in input order. Per-record serialization
    /// still holds: records sharing an identity queue on the same lock.
    pub fn on_save_all<R: SnippetSource + Send>(
        &self,
        records: &mut [R],
    ) -> Vec<Result<SaveOutcome, SnippetError>> {
        records
            .par_iter_mut()
            .map(|record| self.on_save(record))
            .collect()
    }

    fn lock_for(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(identity.to_string()).or_default().clone()
    }
}

/// Deterministic, collision-resistant storage slot key for a record's
/// snippet image. Derived from record identity and snippet type — not
/// content — so repeated regeneration reuses the same slot.
pub fn slot_key(identity: &str, snippet_type: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"snippet\0");
    hasher.update(identity.as_bytes());
    hasher.update(b"\0");
    hasher.update(snippet_type.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..32].to_string()
}
