//! Per-run rate cache keyed by calendar day

use super::base::DateKey;
use hashbrown::HashMap;

/// In-memory DateKey -> rate storage
///
/// Entries are write-once: the first rate stored for a day wins for the
/// lifetime of the cache. There is no eviction.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    rates: HashMap<DateKey, f64>,
}

impl RateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached conversion rate for `date`, if one was stored
    pub fn get(&self, date: DateKey) -> Option<f64> {
        self.rates.get(&date).copied()
    }

    /// Whether `date` already has a rate
    pub fn contains(&self, date: DateKey) -> bool {
        self.rates.contains_key(&date)
    }

    /// Store a rate unless the day is already cached
    ///
    /// Returns the rate in effect for `date` after the call, which is the
    /// earlier value when the day was cached before.
    pub fn insert(&mut self, date: DateKey, rate: f64) -> f64 {
        *self.rates.entry(date).or_insert(rate)
    }

    /// Number of cached days
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
