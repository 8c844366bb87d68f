//! In-memory rate source
//!
//! Serves preloaded raw daily quotes. Used for offline runs and to observe
//! how often a resolver goes to its source.

use super::base::{DateKey, RateSource};
use crate::error::{FxEnrichError, Result};
use std::cell::Cell;
use std::collections::BTreeMap;

/// Preloaded DateKey -> raw rate source with a call counter
///
/// Days without a loaded quote fail with a lookup error, like a provider
/// that has no data for them.
///
/// # Example
/// ```
/// use fx_enrich::rates::{DateKey, InMemoryRateSource, RateSource};
///
/// let day = DateKey::from_ymd(2023, 2, 1).unwrap();
/// let mut source = InMemoryRateSource::new();
/// source.add_rate(day, 40.0).unwrap();
///
/// assert_eq!(source.fetch_rate(day).unwrap(), 40.0);
/// assert_eq!(source.calls(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateSource {
    /// Raw quotes by day
    rates: BTreeMap<DateKey, f64>,
    /// `fetch_rate` is `&self`, so the counter needs interior mutability
    calls: Cell<usize>,
}

impl InMemoryRateSource {
    /// Create a source with no quotes loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw quote (native units per base unit) for one day
    ///
    /// Zero, negative and non-finite quotes are rejected. A second quote for
    /// the same day replaces the first.
    pub fn add_rate(&mut self, date: DateKey, raw: f64) -> Result<()> {
        if !raw.is_finite() || raw <= 0.0 {
            return Err(FxEnrichError::Config(format!(
                "FX rate must be positive, got: {}",
                raw
            )));
        }
        self.rates.insert(date, raw);
        Ok(())
    }

    /// Number of `fetch_rate` calls served so far, including misses
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Number of days with a loaded quote
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateSource for InMemoryRateSource {
    fn fetch_rate(&self, date: DateKey) -> Result<f64> {
        self.calls.set(self.calls.get() + 1);
        self.rates
            .get(&date)
            .copied()
            .ok_or_else(|| FxEnrichError::lookup(date, "no rate loaded for this day"))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
