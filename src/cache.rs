//! In-memory build cache.
//!
//! Memoizes bundle-build results keyed by component path plus last-modified
//! timestamp, so repeated renders of an unchanged component skip validation,
//! project synthesis and both bundler invocations.
//!
//! Deliberately unbounded: no TTL, no LRU, process-lifetime scope. `clear`
//! drops only the in-memory index — work directories stay on disk (a known
//! leak, acceptable for the on-demand build model).
//!
//! No single-flight gating: two concurrent misses for the same key may both
//! build; the second `put` wins. The work directory is keyed by the cache
//! key, so redundant builders write the same content and never corrupt each
//! other.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Artifacts of one successful dual build, immutable once created.
#[derive(Debug, Clone)]
pub struct BundleInfo {
    /// Synthesized build-project directory
    pub work_dir: PathBuf,
    /// Server-executable ES module bundle
    pub server_bundle: PathBuf,
    /// Self-executing client bundle, pre-publication
    pub client_bundle: PathBuf,
    /// Original component source path
    pub component_path: PathBuf,
    /// Resolved component directory
    pub component_dir: PathBuf,
}

/// Cache table mapping cache keys to bundle info.
///
/// Constructed once at process start and passed by handle to the render
/// orchestrator; there is no ambient global.
#[derive(Default)]
pub struct BuildCache {
    entries: Mutex<FxHashMap<String, Arc<BundleInfo>>>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the bundles for a cache key.
    pub fn get(&self, key: &str) -> Option<Arc<BundleInfo>> {
        self.entries.lock().get(key).cloned()
    }

    /// Store bundles for a cache key, replacing any prior entry.
    pub fn put(&self, key: String, info: BundleInfo) {
        self.entries.lock().insert(key, Arc::new(info));
    }

    /// Drop the whole in-memory index.
    ///
    /// Invoked on normal process exit and on interrupt. On-disk work
    /// directories are left in place.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        if count > 0 {
            crate::debug!("cache"; "cleared {} cached build(s)", count);
        }
    }

    /// Number of cached builds.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn info(dir: &str) -> BundleInfo {
        BundleInfo {
            work_dir: PathBuf::from(dir),
            server_bundle: PathBuf::from(dir).join("dist/server/server.mjs"),
            client_bundle: PathBuf::from(dir).join("dist/client/client.js"),
            component_path: PathBuf::from("/apps/demo/www/hello.vue"),
            component_dir: PathBuf::from("/apps/demo/www"),
        }
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = BuildCache::new();
        assert!(cache.get("k1").is_none());

        cache.put("k1".into(), info("/work/a"));
        let hit = cache.get("k1").unwrap();
        assert_eq!(hit.work_dir, PathBuf::from("/work/a"));
    }

    #[test]
    fn test_last_put_wins() {
        let cache = BuildCache::new();
        cache.put("k".into(), info("/work/first"));
        cache.put("k".into(), info("/work/second"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").unwrap().work_dir, PathBuf::from("/work/second"));
    }

    #[test]
    fn test_distinct_keys_are_independent() {
        let cache = BuildCache::new();
        cache.put("a".into(), info("/work/a"));
        cache.put("b".into(), info("/work/b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear_empties_index() {
        let cache = BuildCache::new();
        cache.put("k".into(), info("/work/a"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("k").is_none());
    }
}
