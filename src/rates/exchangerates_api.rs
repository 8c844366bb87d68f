//! exchangeratesapi.io historical rates source
//!
//! One blocking GET per day: `{base_url}/{YYYY-MM-DD}?access_key=..&symbols=..&format=1`.
//! The provider quotes every symbol against its base currency (EUR on the
//! free plan), so the value returned here is "symbol units per 1 EUR".

use super::base::{DateKey, RateSource};
use crate::config::EnrichConfig;
use crate::credential::ApiKey;
use crate::error::{FxEnrichError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Public historical-rates endpoint
pub const DEFAULT_BASE_URL: &str = "http://api.exchangeratesapi.io/v1";

/// Body of a historical-rates response
///
/// Only the fields this source reads. Successful bodies carry `rates`,
/// failed ones `success: false` plus `error`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    success: Option<bool>,
    /// Symbol -> units per one base-currency unit
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// Provider-side error object, e.g. `{"code":101,"type":"invalid_access_key"}`
#[derive(Debug, Deserialize)]
struct ApiError {
    /// Numeric on most errors, a string on some
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    info: Option<String>,
}

impl ApiError {
    /// One-line reason, preferring `info` over `type`
    fn describe(&self) -> String {
        let code = self
            .code
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());
        let detail = self
            .info
            .as_deref()
            .or(self.kind.as_deref())
            .unwrap_or("no details");
        format!("provider error {}: {}", code, detail)
    }
}

/// Extract the raw `symbol` quote from a provider response body
///
/// Malformed JSON, `success: false`, a missing `rates` object and a missing
/// symbol are all `RateLookup` errors for `date`.
///
/// # Example
/// ```
/// use fx_enrich::rates::{parse_rate_response, DateKey};
///
/// let day = DateKey::from_ymd(2023, 2, 1).unwrap();
/// let body = r#"{"success":true,"base":"EUR","rates":{"UAH":40.0}}"#;
/// assert_eq!(parse_rate_response(body, "UAH", day).unwrap(), 40.0);
/// assert!(parse_rate_response(body, "USD", day).is_err());
/// ```
pub fn parse_rate_response(body: &str, symbol: &str, date: DateKey) -> Result<f64> {
    let data: RatesResponse = serde_json::from_str(body)
        .map_err(|e| FxEnrichError::lookup(date, format!("JSON parse error: {}", e)))?;

    if data.success == Some(false) {
        let reason = data
            .error
            .as_ref()
            .map(ApiError::describe)
            .unwrap_or_else(|| "provider reported failure".to_string());
        return Err(FxEnrichError::lookup(date, reason));
    }

    data.rates
        .as_ref()
        .and_then(|rates| rates.get(symbol))
        .copied()
        .ok_or_else(|| FxEnrichError::lookup(date, format!("missing rate for {}", symbol)))
}

/// Blocking client for the historical-rates endpoint
///
/// Any transport failure, non-2xx status or unusable body is reported as a
/// `RateLookup` error. The source never retries.
pub struct ExchangeRatesApiSource {
    client: Client,
    /// Endpoint without a trailing slash
    base_url: String,
    access_key: ApiKey,
    /// Upper-cased provider symbol
    symbol: String,
}

impl ExchangeRatesApiSource {
    /// Create a source against the public endpoint with a 30s timeout
    pub fn new(access_key: ApiKey, symbol: &str) -> Result<Self> {
        Self::with_options(DEFAULT_BASE_URL, access_key, symbol, Duration::from_secs(30))
    }

    /// Create a source from the run configuration's endpoint, symbol and timeout
    pub fn from_config(config: &EnrichConfig, access_key: ApiKey) -> Result<Self> {
        Self::with_options(
            &config.base_url,
            access_key,
            &config.symbol,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create a source with an explicit endpoint and timeout
    ///
    /// A trailing `/` on `base_url` is dropped and `symbol` is upper-cased.
    /// Fails only if the HTTP client cannot be built.
    pub fn with_options(
        base_url: &str,
        access_key: ApiKey,
        symbol: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FxEnrichError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
            symbol: symbol.to_uppercase(),
        })
    }

    /// Symbol sent in the `symbols` query parameter
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl RateSource for ExchangeRatesApiSource {
    fn fetch_rate(&self, date: DateKey) -> Result<f64> {
        let url = format!("{}/{}", self.base_url, date);
        log::debug!("GET {} (symbols={})", url, self.symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.access_key.expose()),
                ("symbols", self.symbol.as_str()),
                ("format", "1"),
            ])
            .send()
            .map_err(|e| FxEnrichError::lookup(date, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FxEnrichError::lookup(date, format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            // Error bodies usually carry the provider's own explanation
            let reason = match parse_rate_response(&body, &self.symbol, date) {
                Err(FxEnrichError::RateLookup { reason, .. }) => {
                    format!("HTTP {} ({})", status, reason)
                }
                _ => format!("HTTP {}", status),
            };
            return Err(FxEnrichError::lookup(date, reason));
        }

        parse_rate_response(&body, &self.symbol, date)
    }

    fn name(&self) -> &str {
        "exchangeratesapi.io"
    }
}
