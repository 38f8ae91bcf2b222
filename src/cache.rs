//! Memoization of chroma floors.
//!
//! A floor depends only on the lightness, the hue specification, the space,
//! the gamut and the precision. [`CacheKey`] encodes those five values
//! verbatim, without rounding, and [`FloorCache`] maps keys to floors with
//! least-recently-used eviction.
//!
//! The cache is shared between threads behind a mutex. A lookup followed by
//! a computation and an insert is not atomic: two threads missing on the
//! same key both compute the floor, and both insert the same value.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::search::HueSpec;
use crate::space::{ColorSpace, Gamut};
use crate::sync::lock_recover;

/// Stable string identifying a chroma floor computation.
///
/// Formatted as `lightness_hues_space_gamut_precision`, for example
/// `0.5_1_oklch_srgb_0.00001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn new(
        lightness: f64,
        hues: &HueSpec,
        space: ColorSpace,
        gamut: Gamut,
        precision: f64,
    ) -> Self {
        Self(format!("{lightness}_{hues}_{space}_{gamut}_{precision}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded LRU map from [`CacheKey`] to chroma floor.
pub struct FloorCache {
    entries: Mutex<LruCache<CacheKey, f64>>,
}

impl FloorCache {
    /// One entry per integer hue step and percent lightness.
    pub const DEFAULT_CAPACITY: usize = 360 * 100;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` floors (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a floor, marking it as recently used.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<f64> {
        let floor = lock_recover(&self.entries).get(key).copied();
        #[cfg(feature = "tracing")]
        tracing::trace!(key = key.as_str(), hit = floor.is_some(), "floor cache lookup");
        floor
    }

    pub fn set(&self, key: CacheKey, floor: f64) {
        lock_recover(&self.entries).put(key, floor);
    }

    /// Return the cached floor for `key`, computing and storing it on a miss.
    ///
    /// The lock is not held while `compute` runs.
    pub fn get_or_insert_with(&self, key: CacheKey, compute: impl FnOnce() -> f64) -> f64 {
        if let Some(floor) = self.get(&key) {
            return floor;
        }
        let floor = compute();
        self.set(key, floor);
        floor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock_recover(&self.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_recover(&self.entries).is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        lock_recover(&self.entries).cap().get()
    }

    /// Drop every cached floor.
    pub fn clear(&self) {
        lock_recover(&self.entries).clear();
    }
}

impl Default for FloorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FloorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloorCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
