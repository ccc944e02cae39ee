//! Per-class cache of validated tree configurations using moka
//!
//! Mapping files are read once per class during metadata loading; the cache
//! keeps the validated result so repeated lookups skip the file system.

use crate::role::FieldRoleConfig;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Validated configurations keyed by class name
///
/// Non-tree classes are cached too, as an empty configuration.
#[derive(Debug, Clone)]
pub struct TreeConfigCache {
    inner: Cache<String, Arc<FieldRoleConfig>>,
}

impl TreeConfigCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Insert configuration for class
    #[inline]
    pub fn insert(&self, class_name: impl Into<String>, config: FieldRoleConfig) {
        self.inner.insert(class_name.into(), Arc::new(config));
    }

    /// Get configuration for class
    #[inline]
    #[must_use]
    pub fn get(&self, class_name: &str) -> Option<Arc<FieldRoleConfig>> {
        self.inner.get(class_name)
    }

    /// Get cached configuration or compute and cache it
    ///
    /// Concurrent callers for the same class share one evaluation of `f`.
    /// Errors from `f` are returned to every waiting caller and nothing is
    /// cached.
    pub fn try_get_or_insert_with<E, F>(
        &self,
        class_name: &str,
        f: F,
    ) -> Result<Arc<FieldRoleConfig>, Arc<E>>
    where
        F: FnOnce() -> Result<FieldRoleConfig, E>,
        E: Send + Sync + 'static,
    {
        self.inner
            .try_get_with_by_ref(class_name, || f().map(Arc::new))
    }

    /// Invalidate cache entry
    #[inline]
    pub fn invalidate(&self, class_name: &str) {
        self.inner.invalidate(class_name);
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if class is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.inner.contains_key(class_name)
    }

    /// Get cache statistics
    ///
    /// Counts are approximate until pending maintenance runs.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for TreeConfigCache {
    /// Create cache with default capacity (1,000 classes)
    fn default() -> Self {
        Self::new(1_000)
    }
}
