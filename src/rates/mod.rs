//! Daily conversion rates
//!
//! # Components
//!
//! - **base**: `DateKey`, the `RateSource` trait, rate inversion
//! - **cache**: write-once per-day `RateCache`
//! - **resolver**: `RateResolver`, timestamp -> rate with caching
//! - **exchangerates_api**: blocking HTTP source for exchangeratesapi.io
//! - **in_memory**: preloaded source for offline runs and tests
//! - **exploding**: testing stub that panics on any lookup

pub mod base;
pub mod cache;
pub mod exchangerates_api;
pub mod exploding;
pub mod in_memory;
pub mod resolver;

pub use base::{invert_rate, DateKey, RateSource, TIMESTAMP_FORMAT};
pub use cache::RateCache;
pub use exchangerates_api::{parse_rate_response, ExchangeRatesApiSource, DEFAULT_BASE_URL};
pub use exploding::ExplodingRateSource;
pub use in_memory::InMemoryRateSource;
pub use resolver::{RateResolver, ResolverStats};
