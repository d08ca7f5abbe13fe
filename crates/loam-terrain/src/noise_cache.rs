//! Per-build memoization of height samples.
//!
//! Keys are integer world grid coordinates, never floats, so two requests
//! for the same vertex always hit the same entry. The cache only saves work:
//! a cached value is exactly the value the source returned for that key.

use rustc_hash::FxHashMap;

use crate::noise_field::HeightSource;

/// Hit/miss counters since the last [`NoiseCache::reset_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that sampled the source.
    pub misses: u64,
}

/// Memoizes height samples keyed by world grid coordinate.
#[derive(Debug, Default)]
pub struct NoiseCache {
    values: FxHashMap<(i64, i64), f64>,
    stats: CacheStats,
}

impl NoiseCache {
    /// Creates an empty cache with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut values = FxHashMap::default();
        values.reserve(capacity);
        Self {
            values,
            stats: CacheStats::default(),
        }
    }

    /// Return the sample at `(x, y)`, consulting `source` only on a miss.
    pub fn get_or_sample<S>(&mut self, source: &S, x: i64, y: i64) -> f64
    where
        S: HeightSource + ?Sized,
    {
        if let Some(&value) = self.values.get(&(x, y)) {
            self.stats.hits += 1;
            return value;
        }
        let value = source.sample(x as f64, y as f64);
        self.values.insert((x, y), value);
        self.stats.misses += 1;
        value
    }

    /// Drop every cached sample, keeping the allocation.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of cached samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Counters accumulated since the last reset.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Zero the hit/miss counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}
