//! Advisory LRU caches for the loot engine.
//!
//! Three caches, each behind its own `parking_lot::Mutex`:
//! - normalised rarity weights per (weight map, level difference)
//! - filtered candidate pools per pool key
//! - resolved monster / area loot tables
//!
//! Entries are derived data only; clearing any of them never changes results.

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::farming::ContentKind;
use crate::loot::ResolvedTable;
use crate::rarity::RarityTier;

pub type WeightKey = (String, i32);
pub type TableKey = (ContentKind, String);

pub struct LootCache {
    weights: Mutex<LruCache<WeightKey, Arc<Vec<(RarityTier, f64)>>>>,
    pools: Mutex<LruCache<String, Arc<Vec<String>>>>,
    tables: Mutex<LruCache<TableKey, Arc<ResolvedTable>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LootCache {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            weights: Mutex::new(LruCache::new(cap)),
            pools: Mutex::new(LruCache::new(cap)),
            tables: Mutex::new(LruCache::new(cap)),
            capacity: cap.get(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn weights_or_insert_with(
        &self,
        key: WeightKey,
        build: impl FnOnce() -> Vec<(RarityTier, f64)>,
    ) -> Arc<Vec<(RarityTier, f64)>> {
        self.get_or_insert(&self.weights, key, build)
    }

    pub fn pool_or_insert_with(
        &self,
        key: String,
        build: impl FnOnce() -> Vec<String>,
    ) -> Arc<Vec<String>> {
        self.get_or_insert(&self.pools, key, build)
    }

    pub fn table_or_insert_with(
        &self,
        key: TableKey,
        build: impl FnOnce() -> ResolvedTable,
    ) -> Arc<ResolvedTable> {
        self.get_or_insert(&self.tables, key, build)
    }

    fn get_or_insert<K: Hash + Eq, V>(
        &self,
        cache: &Mutex<LruCache<K, Arc<V>>>,
        key: K,
        build: impl FnOnce() -> V,
    ) -> Arc<V> {
        if let Some(hit) = cache.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        // Built outside the lock; a racing builder just overwrites with an
        // identical value
        let value = Arc::new(build());
        cache.lock().put(key, value.clone());
        value
    }

    pub fn clear(&self) {
        self.weights.lock().clear();
        self.pools.lock().clear();
        self.tables.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Snapshot without touching LRU order
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            weights: self.weights.lock().len(),
            pools: self.pools.lock().len(),
            tables: self.tables.lock().len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Stable key for a rarity weight map
pub fn weight_map_key(weights: &BTreeMap<RarityTier, f64>) -> String {
    if weights.is_empty() {
        return "default".to_string();
    }
    let mut key = String::new();
    for (tier, w) in weights {
        let _ = write!(key, "{}={:016x};", tier.as_str(), w.to_bits());
    }
    key
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub weights: usize,
    pub pools: usize,
    pub tables: usize,
    /// Per-cache capacity
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn entries(&self) -> usize {
        self.weights + self.pools + self.tables
    }

    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f32 / total as f32) * 100.0
        }
    }
}
