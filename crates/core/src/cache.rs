//! Geometry cache for absolute element bounds.
//!
//! Absolute bounds of nested elements are derived by summing ancestor origins.
//! [`GeometryCache`] memoizes the result per element id. Mutations invalidate
//! single entries (or a subtree) rather than the whole cache.

use crate::geometry::Bounds;
use rustc_hash::FxHashMap;

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CacheStats {
    /// Number of cached entries.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// `hits / (hits + misses)`, or 0.0 before any lookup.
    pub hit_rate: f64,
}

#[derive(Debug, Default)]
pub(crate) struct GeometryCache {
    entries: FxHashMap<String, Bounds>,
    hits: u64,
    misses: u64,
}

impl GeometryCache {
    pub(crate) fn get(&mut self, id: &str) -> Option<Bounds> {
        match self.entries.get(id) {
            Some(bounds) => {
                self.hits += 1;
                Some(*bounds)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub(crate) fn insert(&mut self, id: &str, bounds: Bounds) {
        self.entries.insert(id.to_string(), bounds);
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn invalidate<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        for id in ids {
            self.entries.remove(id);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_counting() {
        let mut cache = GeometryCache::default();
        assert_eq!(cache.get("a"), None);
        cache.insert("a", Bounds::new(1, 2, 3, 4));
        assert_eq!(cache.get("a"), Some(Bounds::new(1, 2, 3, 4)));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalidate_only_named_entries() {
        let mut cache = GeometryCache::default();
        cache.insert("a", Bounds::default());
        cache.insert("b", Bounds::default());
        cache.insert("c", Bounds::default());

        cache.invalidate(&["a".to_string(), "c".to_string()]);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(!cache.contains("c"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_stats() {
        let stats = GeometryCache::default().stats();
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.entries, 0);
    }
}
