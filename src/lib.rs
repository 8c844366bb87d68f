//! # fx_enrich
//!
//! Adds a currency-converted column to delimited financial exports.
//!
//! Each row's timestamp is reduced to a calendar day, the day's rate is
//! resolved once (then served from a per-run cache), and `amount * rate` is
//! inserted as a new column. The first row that cannot be resolved aborts the
//! whole run; no partial output is ever written.
//!
//! ## Example
//!
//! ```rust
//! use fx_enrich::prelude::*;
//!
//! let mut source = InMemoryRateSource::new();
//! // Provider quote: 2 UAH per 1 EUR
//! source.add_rate(DateKey::from_ymd(2023, 2, 1).unwrap(), 2.0).unwrap();
//!
//! let mut resolver = RateResolver::new(source);
//! let enricher = Enricher::new(ColumnLayout::default()).unwrap();
//!
//! let input = "ts,B,C,D,E,F\n01.02.2023 10:00:00,b,c,100.0,e,f\n";
//! let table = enricher.enrich_reader(&mut resolver, input.as_bytes(), b',').unwrap();
//!
//! assert_eq!(table.header[5], "EUR");
//! assert_eq!(table.rows[0][5], "50.0");
//! ```

pub mod config;
pub mod credential;
pub mod enrich;
pub mod error;
pub mod rates;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::EnrichConfig;
    pub use crate::credential::ApiKey;
    pub use crate::enrich::{enrich_file, output_path_for, ColumnLayout, Enricher, OutputTable, RunSummary};
    pub use crate::error::{FxEnrichError, Result};
    pub use crate::rates::{
        DateKey, ExchangeRatesApiSource, InMemoryRateSource, RateCache, RateResolver, RateSource,
    };
}
