//! Snapshot cache for loaded report feeds
//!
//! Report CSVs are re-read on every dashboard refresh, but the files only
//! change when a new export lands. [`SnapshotCache`] memoizes the parsed
//! feed keyed by file content hash: identical bytes return the cached value,
//! changed bytes re-parse, and [`SnapshotCache::clear`] drops everything.
//!
//! The cache is owned by the caller and holds raw loaded feeds only; derived
//! metrics are recomputed per request so each computation sees an immutable
//! snapshot (load, freeze, compute, discard).
//!
//! # Examples
//!
//! ```no_run
//! use mailstat::cache::SnapshotCache;
//! use mailstat::data_loader::{AvailabilitySchema, DataLoader, LoadedFeed};
//! use mailstat::types::AvailabilityRecord;
//! use std::path::Path;
//!
//! # fn example() -> mailstat::Result<()> {
//! let mut cache: SnapshotCache<LoadedFeed<AvailabilityRecord>> = SnapshotCache::new();
//! let schema = AvailabilitySchema::default();
//! let feed = cache.get_or_load(Path::new("report.csv"), |bytes| {
//!     DataLoader::availability_from_reader(bytes, &schema)
//! })?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

struct CacheEntry<T> {
    content_hash: u64,
    value: Arc<T>,
}

/// Content-hash-keyed memoization of parsed feeds
pub struct SnapshotCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T> SnapshotCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the cached feed for `path`, re-parsing only when the file
    /// content changed
    ///
    /// The file is read wholly before any parsing; `parse` receives the raw
    /// bytes and runs at most once per distinct content.
    pub fn get_or_load<F>(&mut self, path: &Path, parse: F) -> Result<Arc<T>>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        let bytes = std::fs::read(path)?;
        let content_hash = hash_bytes(&bytes);

        if let Some(entry) = self.entries.get(path)
            && entry.content_hash == content_hash
        {
            debug!(path = %path.display(), "snapshot cache hit");
            return Ok(Arc::clone(&entry.value));
        }

        let value = Arc::new(parse(&bytes)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                content_hash,
                value: Arc::clone(&value),
            },
        );
        debug!(path = %path.display(), "snapshot cache miss, parsed");
        Ok(value)
    }

    /// Drop every cached feed
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached feeds
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(path: &Path, content: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_parse_runs_once_for_unchanged_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.csv");
        write_file(&path, "hello");

        let mut cache: SnapshotCache<usize> = SnapshotCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let value = cache
                .get_or_load(&path, |bytes| {
                    calls += 1;
                    Ok(bytes.len())
                })
                .unwrap();
            assert_eq!(*value, 5);
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_content_reparses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.csv");
        write_file(&path, "one");

        let mut cache: SnapshotCache<String> = SnapshotCache::new();
        let first = cache
            .get_or_load(&path, |bytes| Ok(String::from_utf8_lossy(bytes).into_owned()))
            .unwrap();
        assert_eq!(*first, "one");

        write_file(&path, "two!");
        let second = cache
            .get_or_load(&path, |bytes| Ok(String::from_utf8_lossy(bytes).into_owned()))
            .unwrap();
        assert_eq!(*second, "two!");
    }

    #[test]
    fn test_clear_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.csv");
        write_file(&path, "data");

        let mut cache: SnapshotCache<()> = SnapshotCache::new();
        let mut calls = 0;
        cache
            .get_or_load(&path, |_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache
            .get_or_load(&path, |_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut cache: SnapshotCache<()> = SnapshotCache::new();
        let result = cache.get_or_load(Path::new("/nonexistent/feed.csv"), |_| Ok(()));
        assert!(result.is_err());
    }
}
