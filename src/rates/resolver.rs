//! Rate resolver - timestamp -> cached or freshly fetched conversion rate

use super::base::{invert_rate, DateKey, RateSource};
use super::cache::RateCache;
use crate::error::Result;

/// Counters for one resolver's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Resolutions answered from the cache
    pub hits: usize,
    /// Calls made to the rate source (successful or not)
    pub lookups: usize,
}

/// Resolves a conversion rate per row timestamp
///
/// Owns its `RateCache`, so two resolvers never share state. A source is
/// asked at most once per successfully resolved day; failed lookups leave
/// the cache untouched and are retried on the next call for that day.
///
/// # Example
/// ```
/// use fx_enrich::rates::{DateKey, InMemoryRateSource, RateResolver};
///
/// let mut source = InMemoryRateSource::new();
/// source.add_rate(DateKey::from_ymd(2023, 2, 1).unwrap(), 40.0).unwrap();
///
/// let mut resolver = RateResolver::new(source);
/// let rate = resolver.resolve("01.02.2023 10:00:00").unwrap();
/// assert_eq!(rate, 0.025);
///
/// // Same day, different time: served from the cache
/// resolver.resolve("01.02.2023 18:45:00").unwrap();
/// assert_eq!(resolver.source().calls(), 1);
/// ```
#[derive(Debug)]
pub struct RateResolver<S> {
    source: S,
    cache: RateCache,
    stats: ResolverStats,
}

impl<S: RateSource> RateResolver<S> {
    /// Create a resolver with an empty cache
    pub fn new(source: S) -> Self {
        Self::with_cache(source, RateCache::new())
    }

    /// Create a resolver seeded with an existing cache
    pub fn with_cache(source: S, cache: RateCache) -> Self {
        Self {
            source,
            cache,
            stats: ResolverStats::default(),
        }
    }

    /// Resolve the rate for a raw `DD.MM.YYYY HH:MM:SS` timestamp
    pub fn resolve(&mut self, timestamp: &str) -> Result<f64> {
        let date = DateKey::parse(timestamp).map_err(|e| {
            log::error!("Error formatting date {:?}: {}", timestamp, e);
            e
        })?;
        self.resolve_date(date)
    }

    /// Resolve the rate for an already normalized day
    pub fn resolve_date(&mut self, date: DateKey) -> Result<f64> {
        if let Some(rate) = self.cache.get(date) {
            self.stats.hits += 1;
            log::info!("Using cached exchange rate for {}", date);
            return Ok(rate);
        }

        self.stats.lookups += 1;
        let fetched = self
            .source
            .fetch_rate(date)
            .and_then(|raw| invert_rate(raw, date));

        match fetched {
            Ok(rate) => {
                let rate = self.cache.insert(date, rate);
                log::info!(
                    "Retrieved exchange rate for {} from {}: {}",
                    date,
                    self.source.name(),
                    rate
                );
                Ok(rate)
            }
            Err(e) => {
                log::error!("Error fetching exchange rate for {}: {}", date, e);
                Err(e)
            }
        }
    }

    /// Rates resolved so far
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cache hits and source lookups since construction
    pub fn stats(&self) -> ResolverStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxEnrichError;
    use crate::rates::{ExplodingRateSource, InMemoryRateSource};

    fn feb(day: u32) -> DateKey {
        DateKey::from_ymd(2023, 2, day).unwrap()
    }

    #[test]
    fn test_same_day_single_lookup() {
        let mut source = InMemoryRateSource::new();
        source.add_rate(feb(1), 40.0).unwrap();
        let mut resolver = RateResolver::new(source);

        for ts in ["01.02.2023 09:00:00", "01.02.2023 12:00:00", "01.02.2023 23:59:59"] {
            assert_eq!(resolver.resolve(ts).unwrap(), 0.025);
        }

        assert_eq!(resolver.source().calls(), 1);
        assert_eq!(resolver.stats(), ResolverStats { hits: 2, lookups: 1 });
    }

    #[test]
    fn test_each_day_looked_up_once() {
        let mut source = InMemoryRateSource::new();
        source.add_rate(feb(1), 40.0).unwrap();
        source.add_rate(feb(2), 50.0).unwrap();
        let mut resolver = RateResolver::new(source);

        resolver.resolve("01.02.2023 10:00:00").unwrap();
        assert_eq!(resolver.resolve("02.02.2023 10:00:00").unwrap(), 0.02);
        resolver.resolve("01.02.2023 11:00:00").unwrap();
        resolver.resolve("02.02.2023 11:00:00").unwrap();

        assert_eq!(resolver.source().calls(), 2);
        assert_eq!(resolver.cache().len(), 2);
    }

    #[test]
    fn test_bad_date_skips_source() {
        let mut resolver = RateResolver::new(ExplodingRateSource::new());
        let result = resolver.resolve("not-a-date");
        assert!(matches!(result, Err(FxEnrichError::DateFormat { .. })));
        assert_eq!(resolver.stats().lookups, 0);
    }

    #[test]
    fn test_failed_lookup_not_cached() {
        let mut resolver = RateResolver::new(InMemoryRateSource::new());

        let first = resolver.resolve("01.02.2023 10:00:00");
        assert!(matches!(first, Err(FxEnrichError::RateLookup { .. })));
        assert!(resolver.cache().is_empty());

        // A failed day is asked for again, not remembered as missing
        let _ = resolver.resolve("01.02.2023 11:00:00");
        assert_eq!(resolver.source().calls(), 2);
    }

    #[test]
    fn test_seeded_cache_never_calls_source() {
        let mut cache = RateCache::new();
        cache.insert(feb(1), 0.5);
        let mut resolver = RateResolver::with_cache(ExplodingRateSource::new(), cache);

        assert_eq!(resolver.resolve("01.02.2023 10:00:00").unwrap(), 0.5);
        assert_eq!(resolver.stats().hits, 1);
    }

    #[test]
    fn test_independent_resolvers() {
        let mut source = InMemoryRateSource::new();
        source.add_rate(feb(1), 40.0).unwrap();

        let mut first = RateResolver::new(&source);
        let mut second = RateResolver::new(&source);
        first.resolve("01.02.2023 10:00:00").unwrap();
        second.resolve("01.02.2023 10:00:00").unwrap();

        assert_eq!(source.calls(), 2);
    }
}
