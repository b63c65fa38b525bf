//! Process-lifetime cache of parsed source files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

struct CacheEntry<T> {
    /// `None` when the file did not exist at load time.
    modified: Option<SystemTime>,
    value: Arc<T>,
}

/// Hit/miss counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Maps a file path and its modification time to the parsed value.
///
/// A lookup reuses the cached value while the file's modification time is
/// unchanged and reloads otherwise. Absent files are cached too, keyed by
/// the absence, so a file appearing later is picked up. Entries live until
/// the cache is dropped.
pub struct SourceCache<T> {
    entries: Mutex<HashMap<PathBuf, CacheEntry<T>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<T> SourceCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the cached value for `path`, running `load` on a miss.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Arc<T>
    where
        F: FnOnce(&Path) -> T,
    {
        let modified = modification_time(path);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(entry) = entries.get(path) {
            if entry.modified == modified {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("Cache hit for '{}'", path.display());
                return Arc::clone(&entry.value);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(load(path));
        entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                value: Arc::clone(&value),
            },
        );
        value
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner()).len();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn modification_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
