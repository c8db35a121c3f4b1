use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::debug;

use super::encoding::cache_key;
use super::selection::FacetSelection;

/// Memoized filter results for one immutable catalog, keyed by the canonical
/// encoded selection. Entries hold positions into the catalog's scheme slice.
#[derive(Debug)]
pub struct FilterCache {
    entries: Option<Mutex<LruCache<String, Arc<[usize]>>>>,
}

impl FilterCache {
    /// A capacity of zero disables memoization.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|capacity| Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn disabled() -> Self {
        Self { entries: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    pub fn get_or_compute<F>(&self, selection: &FacetSelection, compute: F) -> Arc<[usize]>
    where
        F: FnOnce() -> Vec<usize>,
    {
        let Some(entries) = &self.entries else {
            return compute().into();
        };

        let key = cache_key(selection);
        if let Ok(mut guard) = entries.lock() {
            if let Some(hit) = guard.get(&key) {
                debug!(key = %key, "filter cache hit");
                return Arc::clone(hit);
            }
        }

        let computed: Arc<[usize]> = compute().into();
        if let Ok(mut guard) = entries.lock() {
            guard.put(key, Arc::clone(&computed));
        }
        computed
    }

    pub fn len(&self) -> usize {
        self.entries
            .as_ref()
            .and_then(|entries| entries.lock().ok().map(|guard| guard.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FilterCache {
    fn default() -> Self {
        Self::new(128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::facets::FacetDimension;
    use std::cell::Cell;

    #[test]
    fn equivalent_selections_share_an_entry() {
        let cache = FilterCache::new(4);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            vec![0, 2]
        };

        let first = FacetSelection::new()
            .with(FacetDimension::State, "Kerala")
            .with_query("Loan");
        let second = FacetSelection::new()
            .with(FacetDimension::State, "Kerala")
            .with_query("loan ");

        assert_eq!(&*cache.get_or_compute(&first, compute), &[0, 2]);
        assert_eq!(&*cache.get_or_compute(&second, compute), &[0, 2]);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_capacity_always_recomputes() {
        let cache = FilterCache::new(0);
        let calls = Cell::new(0);
        let selection = FacetSelection::new();
        for _ in 0..3 {
            cache.get_or_compute(&selection, || {
                calls.set(calls.get() + 1);
                Vec::new()
            });
        }
        assert!(!cache.is_enabled());
        assert_eq!(calls.get(), 3);
        assert!(cache.is_empty());
    }
}
