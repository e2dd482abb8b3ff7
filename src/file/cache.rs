//! Optional LRU cache of decoded line ranges.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Cache key: (start line, line count)
type RangeKey = (usize, usize);

/// Decoded ranges keyed by `(start_line, count)`.
///
/// The whole cache is dropped once the file is seen at a size other than the
/// one it was indexed at.
pub struct RangeCache {
    entries: Mutex<LruCache<RangeKey, Vec<String>>>,
    /// Size the cached entries were read at
    observed_size: AtomicU64,
}

impl RangeCache {
    pub fn new(capacity: NonZeroUsize, indexed_size: u64) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            observed_size: AtomicU64::new(indexed_size),
        }
    }

    pub fn get(&self, start: usize, count: usize) -> Option<Vec<String>> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(&(start, count)).cloned()
    }

    pub fn put(&self, start: usize, count: usize, lines: Vec<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put((start, count), lines);
        }
    }

    /// Clear every entry if the file size changed. Returns true when cleared.
    pub fn invalidate_if_resized(&self, current_size: u64) -> bool {
        let previous = self.observed_size.swap(current_size, Ordering::AcqRel);
        if previous == current_size {
            return false;
        }

        warn!(
            previous,
            current_size, "file size changed since indexing, dropping cached ranges"
        );
        self.clear();
        true
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
