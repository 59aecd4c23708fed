//! Preference Persistence - Load-once, save-on-change.
//!
//! Preferences (filter sets, page size, timed config, panel flag) live in
//! an external key-value store behind the [`PrefStore`] port. The store is
//! read once at startup and written on every change; missing or corrupt
//! blobs fall back to defaults silently.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use spark_signals::effect;
use thiserror::Error;

use super::{filter, pager, panel, timed_config};

/// Storage key for the preference blob.
pub const PREFS_KEY: &str = "spark-canvas-prefs";

/// Error type for preference storage.
#[derive(Debug, Error)]
pub enum PrefError {
    /// Key not present in the store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Storage port for raw preference blobs (keyed by logical name).
pub trait PrefStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, PrefError>;
    /// Persist a raw blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), PrefError>;
}

/// The persisted preference blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub active_collections: BTreeSet<String>,
    #[serde(default)]
    pub active_tags: BTreeSet<String>,
    #[serde(default)]
    pub active_years: BTreeSet<i32>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_lifespan")]
    pub lifespan_ms: u64,
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
    #[serde(default = "default_true")]
    pub panel_visible: bool,
}

fn default_page_size() -> usize {
    pager::DEFAULT_PAGE_SIZE
}

fn default_lifespan() -> u64 {
    timed_config::TimedConfig::default().lifespan_ms
}

fn default_fade() -> u64 {
    timed_config::TimedConfig::default().fade_ms
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            active_collections: BTreeSet::new(),
            active_tags: BTreeSet::new(),
            active_years: BTreeSet::new(),
            page_size: default_page_size(),
            lifespan_ms: default_lifespan(),
            fade_ms: default_fade(),
            panel_visible: true,
        }
    }
}

impl Preferences {
    /// Snapshot the current signal state.
    pub fn capture() -> Self {
        let cfg = timed_config::timed_config();
        Self {
            active_collections: filter::active_collections(),
            active_tags: filter::active_tags(),
            active_years: filter::active_years(),
            page_size: pager::page_size(),
            lifespan_ms: cfg.lifespan_ms,
            fade_ms: cfg.fade_ms,
            panel_visible: panel::panel_visible(),
        }
    }

    /// Apply this blob to the signals.
    ///
    /// An empty persisted collection set is treated as "never saved" and
    /// left at the init-time default (all collections selected) - an empty
    /// set is not a valid startup state.
    pub fn apply(&self) {
        if !self.active_collections.is_empty() {
            filter::set_active_collections(self.active_collections.clone());
        }
        filter::set_active_tags(self.active_tags.clone());
        filter::set_active_years(self.active_years.clone());
        pager::set_page_size(self.page_size);
        timed_config::set_timed_config(self.lifespan_ms, self.fade_ms);
        panel::set_panel_visible(self.panel_visible);
    }
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

/// Read preferences from the store and apply them. Missing or corrupt
/// entries fall back to defaults silently.
pub fn load_preferences(store: &dyn PrefStore) {
    match store.load_raw(PREFS_KEY) {
        Ok(bytes) => match serde_json::from_slice::<Preferences>(&bytes) {
            Ok(prefs) => {
                debug!("loaded preferences");
                prefs.apply();
            }
            Err(e) => warn!("corrupt preference blob, using defaults: {e}"),
        },
        Err(PrefError::NotFound) => {}
        Err(e) => warn!("preference store unreadable, using defaults: {e}"),
    }
}

/// Snapshot the signals and write them to the store (best effort).
pub fn save_preferences(store: &dyn PrefStore) {
    let prefs = Preferences::capture();
    match serde_json::to_vec_pretty(&prefs) {
        Ok(bytes) => {
            if let Err(e) = store.save_raw(PREFS_KEY, &bytes) {
                warn!("failed to save preferences: {e}");
            }
        }
        Err(e) => warn!("failed to encode preferences: {e}"),
    }
}

/// Create an effect that re-saves preferences whenever any persisted signal
/// changes. Returns the stop function.
pub fn create_autosave_effect(store: Box<dyn PrefStore>) -> impl FnOnce() {
    effect(move || {
        // Read every persisted signal to establish dependencies.
        let _ = filter::active_collections_signal().get();
        let _ = filter::active_tags_signal().get();
        let _ = filter::active_years_signal().get();
        let _ = pager::page_size_signal().get();
        let _ = timed_config::timed_config_signal().get();
        let _ = panel::panel_visible_signal().get();
        save_preferences(store.as_ref());
    })
}

// =============================================================================
// STORES
// =============================================================================

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryPrefStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, PrefError> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or(PrefError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), PrefError> {
        self.blobs.borrow_mut().insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

/// Filesystem store: one JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FilePrefStore {
    dir: PathBuf,
}

impl FilePrefStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PrefStore for FilePrefStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, PrefError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(PrefError::NotFound);
        }
        Ok(fs::read(path)?)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), PrefError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), data)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        filter::reset_filter_state();
        pager::reset_pager_state();
        timed_config::reset_timed_config();
        panel::reset_panel_state();
    }

    #[test]
    fn test_roundtrip_memory() {
        setup();
        let store = MemoryPrefStore::new();
        filter::toggle_collection("art", true);
        pager::set_page_size(12);
        timed_config::set_timed_config(8000, 1000);
        panel::set_panel_visible(false);
        save_preferences(&store);

        setup();
        load_preferences(&store);
        assert!(filter::active_collections().contains("art"));
        assert_eq!(pager::page_size(), 12);
        assert_eq!(timed_config::timed_config().lifespan_ms, 8000);
        assert!(!panel::panel_visible());
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_defaults() {
        setup();
        let store = MemoryPrefStore::new();
        store.save_raw(PREFS_KEY, b"{not json").unwrap();
        load_preferences(&store);
        assert_eq!(pager::page_size(), pager::DEFAULT_PAGE_SIZE);
        assert!(panel::panel_visible());
    }

    #[test]
    fn test_missing_blob_is_silent() {
        setup();
        let store = MemoryPrefStore::new();
        load_preferences(&store);
        assert_eq!(timed_config::timed_config(), timed_config::TimedConfig::default());
    }

    #[test]
    fn test_file_store_roundtrip() {
        setup();
        let dir = tempfile::tempdir().unwrap();
        let store = FilePrefStore::new(dir.path());
        pager::set_page_size(7);
        save_preferences(&store);

        setup();
        load_preferences(&store);
        assert_eq!(pager::page_size(), 7);
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        setup();
        let store = MemoryPrefStore::new();
        store
            .save_raw(PREFS_KEY, br#"{"page_size": 5}"#)
            .unwrap();
        load_preferences(&store);
        assert_eq!(pager::page_size(), 5);
        assert_eq!(timed_config::timed_config().fade_ms, 2000);
    }
}
