//! Base rate types - DateKey and the RateSource trait

use crate::error::{FxEnrichError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt;

/// Timestamp layout used by the exports: `DD.MM.YYYY HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Calendar day used to bucket and cache rates
///
/// Every timestamp on the same calendar day maps to the same key, whatever
/// its time-of-day component.
///
/// # Example
/// ```
/// use fx_enrich::rates::DateKey;
///
/// let morning = DateKey::parse("01.02.2023 08:00:00").unwrap();
/// let night = DateKey::parse("01.02.2023 23:30:00").unwrap();
/// assert_eq!(morning, night);
/// assert_eq!(morning.to_string(), "2023-02-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parse a raw row timestamp into its calendar day
    ///
    /// Whitespace is only accepted between the date and the time. chrono
    /// would otherwise skip it in front of any numeric field.
    pub fn parse(timestamp: &str) -> Result<Self> {
        let date_format = |reason: String| FxEnrichError::DateFormat {
            timestamp: timestamp.to_string(),
            reason,
        };

        if timestamp.trim() != timestamp || timestamp.split_whitespace().count() != 2 {
            return Err(date_format(
                "unexpected whitespace or missing time".to_string(),
            ));
        }

        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map(|dt| DateKey(dt.date()))
            .map_err(|e| date_format(e.to_string()))
    }

    /// Build a key from calendar parts; `None` for impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DateKey)
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, starting from 1
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, starting from 1
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for DateKey {
    /// Day-keyed form used by rate providers (`YYYY-MM-DD`)
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Source of raw daily rates
///
/// A raw rate is quoted the way providers publish it: units of the table's
/// native currency per one unit of the provider's base currency.
pub trait RateSource {
    /// Fetch the raw rate for one day
    fn fetch_rate(&self, date: DateKey) -> Result<f64>;

    /// Source name for log output
    fn name(&self) -> &str;
}

impl<S: RateSource + ?Sized> RateSource for &S {
    fn fetch_rate(&self, date: DateKey) -> Result<f64> {
        (**self).fetch_rate(date)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Turn a raw provider quote into a conversion multiplier (its reciprocal)
///
/// Zero, negative and non-finite quotes are lookup failures for `date`.
pub fn invert_rate(raw: f64, date: DateKey) -> Result<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return Err(FxEnrichError::lookup(
            date,
            format!("cannot invert non-positive rate: {}", raw),
        ));
    }
    Ok(1.0 / raw)
}
