//! Blocking HTTP rate source against a local stub server

mod common;

use common::RateStub;
use fx_enrich::error::FxEnrichError;
use fx_enrich::prelude::*;
use std::time::Duration;

fn source_for(stub: &RateStub, key: &str) -> ExchangeRatesApiSource {
    ExchangeRatesApiSource::with_options(&stub.base_url, ApiKey::new(key), "UAH", Duration::from_secs(5))
        .unwrap()
}

#[test]
fn test_request_shape() {
    let stub = RateStub::fixed("UAH", 40.0);
    let source = source_for(&stub, "secret");

    let raw = source
        .fetch_rate(DateKey::from_ymd(2023, 2, 1).unwrap())
        .unwrap();
    assert_eq!(raw, 40.0);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        "/v1/2023-02-01?access_key=secret&symbols=UAH&format=1"
    );
}

#[test]
fn test_resolver_inverts_and_caches() {
    let stub = RateStub::fixed("UAH", 40.0);
    let mut resolver = RateResolver::new(source_for(&stub, "secret"));

    assert_eq!(resolver.resolve("01.02.2023 09:15:00").unwrap(), 0.025);
    assert_eq!(resolver.resolve("01.02.2023 17:40:00").unwrap(), 0.025);

    assert_eq!(stub.requests().len(), 1);
}

#[test]
fn test_missing_symbol_is_lookup_error() {
    let stub = RateStub::fixed("USD", 1.09);
    let mut resolver = RateResolver::new(source_for(&stub, "secret"));

    let err = resolver.resolve("01.02.2023 09:15:00").unwrap_err();
    assert!(matches!(err, FxEnrichError::RateLookup { .. }));
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_provider_error_reported() {
    let stub = RateStub::start(Box::new(|_: &str| {
        (
            "200 OK",
            r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"You have not supplied a valid API Access Key."}}"#
                .to_string(),
        )
    }));
    let source = source_for(&stub, "wrong");

    let err = source
        .fetch_rate(DateKey::from_ymd(2023, 2, 1).unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("valid API Access Key"));
}

#[test]
fn test_http_status_error() {
    let stub = RateStub::start(Box::new(|_: &str| ("503 Service Unavailable", "busy".to_string())));
    let source = source_for(&stub, "secret");

    let err = source
        .fetch_rate(DateKey::from_ymd(2023, 2, 1).unwrap())
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("503"), "unexpected message: {}", msg);
}

#[test]
fn test_connection_refused() {
    // Bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let source = ExchangeRatesApiSource::with_options(
        &format!("http://127.0.0.1:{}/v1", port),
        ApiKey::new("secret"),
        "UAH",
        Duration::from_secs(2),
    )
    .unwrap();

    let err = source
        .fetch_rate(DateKey::from_ymd(2023, 2, 1).unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("HTTP request failed"));
}
