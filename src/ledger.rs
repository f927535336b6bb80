//! Snapshot ledger for restart-safe change detection.
//!
//! The lifecycle manager decides whether to regenerate by comparing the
//! current attribute snapshot against the one that produced the stored
//! image. This module persists that "last rendered" snapshot per record
//! so the comparison survives process restarts: without it, every record
//! would re-render once after each restart even when nothing changed.
//!
//! ## Storage
//!
//! The ledger is a JSON file at `<dir>/.snippet-ledger.json`, living
//! alongside the generated images so it travels with the output
//! directory. Entries are keyed by `"{identity}/{snippet_type}"`.
//!
//! Loading is forgiving: a missing, corrupt, or version-mismatched file
//! yields an empty ledger, which merely costs one regeneration per
//! record — never an error, never a wrong image.

use crate::record::Snapshot;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the ledger file within the output directory.
const LEDGER_FILENAME: &str = ".snippet-ledger.json";

/// Version of the ledger format. Bump this to invalidate all existing
/// ledgers when the format or key computation changes.
const LEDGER_VERSION: u32 = 1;

/// On-disk map from record identity + snippet type to the snapshot that
/// produced the currently stored image.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SnapshotLedger {
    pub version: u32,
    pub entries: HashMap<String, Snapshot>,
}

impl SnapshotLedger {
    /// Create an empty ledger (first run, or after a format bump).
    pub fn empty() -> Self {
        Self {
            version: LEDGER_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from a directory. Returns an empty ledger if the file doesn't
    /// exist or can't be parsed (version mismatch, corruption).
    pub fn load(dir: &Path) -> Self {
        let content = match std::fs::read_to_string(ledger_path(dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let ledger: Self = match serde_json::from_str(&content) {
            Ok(l) => l,
            Err(_) => return Self::empty(),
        };
        if ledger.version != LEDGER_VERSION {
            return Self::empty();
        }
        ledger
    }

    /// Save to a directory.
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(ledger_path(dir), json)
    }

    /// Snapshot that produced the current image for this record and
    /// snippet type, if one was recorded.
    pub fn get(&self, identity: &str, snippet_type: &str) -> Option<&Snapshot> {
        self.entries.get(&entry_key(identity, snippet_type))
    }

    /// Record the snapshot that just produced an image.
    pub fn insert(&mut self, identity: &str, snippet_type: &str, snapshot: Snapshot) {
        self.entries.insert(entry_key(identity, snippet_type), snapshot);
    }
}

fn entry_key(identity: &str, snippet_type: &str) -> String {
    format!("{identity}/{snippet_type}")
}

/// Resolve the ledger path for an output directory.
pub fn ledger_path(dir: &Path) -> PathBuf {
    dir.join(LEDGER_FILENAME)
}
