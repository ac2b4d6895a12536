//! In-memory LRU cache for encoded station icons.
//!
//! Keys are canonical icon ids. An id embeds every value that affects the
//! icon's pixels, so entries never go stale and are only dropped under
//! memory pressure.
//!
//! When an insert would push the cache over its byte limit, ~5% of the
//! limit is evicted in one batch, least recently used first.

use bytes::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

// LruCache needs an entry bound; eviction is driven by bytes instead.
const LRU_CAPACITY: usize = 1_000_000;

/// Memory-bounded icon cache.
pub struct IconCache {
    cache: Arc<RwLock<LruCache<String, Bytes>>>,
    max_bytes: u64,
    stats: Arc<IconCacheStats>,
}

/// Counters for the icon cache.
#[derive(Debug, Default)]
pub struct IconCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub eviction_runs: AtomicU64,
    pub size_bytes: AtomicU64,
    pub entry_count: AtomicU64,
}

/// Point-in-time copy of [`IconCacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct IconCacheSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub eviction_runs: u64,
    pub size_bytes: u64,
    pub entry_count: u64,
}

impl IconCacheSnapshot {
    /// Hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl IconCache {
    /// Create a cache holding at most `max_size_kb` kilobytes of PNG data.
    pub fn new(max_size_kb: usize) -> Self {
        let capacity = NonZeroUsize::new(LRU_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(RwLock::new(LruCache::new(capacity))),
            max_bytes: (max_size_kb as u64) * 1024,
            stats: Arc::new(IconCacheStats::default()),
        }
    }

    /// Look up an icon by canonical id.
    pub async fn get(&self, id: &str) -> Option<Bytes> {
        // write lock: a hit bumps the entry's recency
        let mut cache = self.cache.write().await;
        match cache.get(id) {
            Some(data) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(data.clone())
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store an encoded icon under its canonical id.
    pub async fn insert(&self, id: &str, data: Bytes) {
        let size = data.len() as u64;
        let mut cache = self.cache.write().await;

        if self.stats.size_bytes.load(Ordering::Relaxed) + size > self.max_bytes {
            self.evict_batch_locked(&mut cache);
        }

        match cache.put(id.to_string(), data) {
            Some(previous) => {
                self.stats
                    .size_bytes
                    .fetch_sub(previous.len() as u64, Ordering::Relaxed);
            }
            None => {
                self.stats.entry_count.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.stats.size_bytes.fetch_add(size, Ordering::Relaxed);
    }

    fn evict_batch_locked(&self, cache: &mut LruCache<String, Bytes>) {
        let target_free = (self.max_bytes / 20).max(1);
        let mut bytes_freed = 0u64;
        let mut evicted = 0u64;

        while bytes_freed < target_free {
            match cache.pop_lru() {
                Some((_, data)) => {
                    bytes_freed += data.len() as u64;
                    evicted += 1;
                }
                None => break,
            }
        }

        self.stats.size_bytes.fetch_sub(bytes_freed, Ordering::Relaxed);
        self.stats.entry_count.fetch_sub(evicted, Ordering::Relaxed);
        self.stats.evictions.fetch_add(evicted, Ordering::Relaxed);
        self.stats.eviction_runs.fetch_add(1, Ordering::Relaxed);

        info!(
            entries_evicted = evicted,
            bytes_freed = bytes_freed,
            max_bytes = self.max_bytes,
            "Icon cache batch eviction completed"
        );
    }

    pub fn stats(&self) -> IconCacheSnapshot {
        IconCacheSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            eviction_runs: self.stats.eviction_runs.load(Ordering::Relaxed),
            size_bytes: self.stats.size_bytes.load(Ordering::Relaxed),
            entry_count: self.stats.entry_count.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.stats.entry_count.load(Ordering::Relaxed) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.stats.size_bytes.load(Ordering::Relaxed)
    }

    /// Drop every entry and reset the counters.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();

        self.stats.hits.store(0, Ordering::Relaxed);
        self.stats.misses.store(0, Ordering::Relaxed);
        self.stats.evictions.store(0, Ordering::Relaxed);
        self.stats.eviction_runs.store(0, Ordering::Relaxed);
        self.stats.size_bytes.store(0, Ordering::Relaxed);
        self.stats.entry_count.store(0, Ordering::Relaxed);
    }
}
