//! Exploding rate source - testing stub
//!
//! Panics on any lookup. Pair it with a seeded `RateCache` to prove that a
//! code path is served entirely from the cache.

use super::base::{DateKey, RateSource};
use crate::error::Result;

/// Rate source that panics when asked for a rate
///
/// # Example
/// ```should_panic
/// use fx_enrich::rates::{DateKey, ExplodingRateSource, RateSource};
///
/// let source = ExplodingRateSource::new();
/// source.fetch_rate(DateKey::from_ymd(2023, 2, 1).unwrap()).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplodingRateSource {
    message: Option<&'static str>,
}

impl ExplodingRateSource {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }
}

impl RateSource for ExplodingRateSource {
    fn fetch_rate(&self, date: DateKey) -> Result<f64> {
        panic!(
            "{}\n\nAttempted lookup for {}",
            self.message
                .unwrap_or("Rate source access not allowed: this lookup should hit the cache."),
            date
        );
    }

    fn name(&self) -> &str {
        "exploding"
    }
}
