use anyhow::Result;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use price_relay::config::OracleConfig;
use price_relay::services::{BandOracleClient, PriceSource};
use price_relay::RelayError;

const PRICE_PATH: &str = "/oracle/request_prices";

fn symbols() -> Vec<String> {
    vec!["BTC".to_string(), "ETH".to_string(), "BAND".to_string()]
}

fn oracle(server: &MockServer) -> Result<BandOracleClient> {
    let config = OracleConfig {
        url: format!("{}{}", server.uri(), PRICE_PATH),
        symbols: symbols(),
        min_count: 10,
        ask_count: 16,
    };
    Ok(BandOracleClient::new(&config, Duration::from_secs(5))?)
}

fn band_result() -> serde_json::Value {
    json!({
        "result": [
            {"symbol": "BTC", "multiplier": "1000000000", "px": "56871230000000", "request_id": "1830", "resolve_time": "1620000000"},
            {"symbol": "ETH", "multiplier": "1000000000", "px": "3412500000000", "request_id": "1830", "resolve_time": "1620000000"},
            {"symbol": "BAND", "multiplier": "1000000000", "px": "14203000000", "request_id": "1829", "resolve_time": "1619999990"}
        ]
    })
}

#[tokio::test]
async fn test_fetch_builds_aligned_payload() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICE_PATH))
        .and(body_json(json!({
            "symbols": ["BTC", "ETH", "BAND"],
            "min_count": 10,
            "ask_count": 16
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(band_result()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = oracle(&server)?
        .fetch_prices(&symbols())
        .await
        .expect("prices should be returned");

    assert!(payload.is_aligned());
    assert_eq!(payload.symbols, symbols());
    assert_eq!(
        payload.rates,
        vec!["56871230000000", "3412500000000", "14203000000"]
    );
    assert_eq!(payload.request_ids, vec![1830, 1830, 1829]);
    assert_eq!(payload.resolve_times, vec![1620000000, 1620000000, 1619999990]);
    Ok(())
}

#[tokio::test]
async fn test_wrapped_response_is_accepted() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": band_result() })))
        .mount(&server)
        .await;

    let payload = oracle(&server)?.request_prices(&symbols()).await?;
    assert_eq!(payload.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_error_status_yields_no_prices() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = oracle(&server)?;
    assert!(client.fetch_prices(&symbols()).await.is_none());

    let err = client.request_prices(&symbols()).await.unwrap_err();
    assert!(matches!(err, RelayError::FetchFailure(_)));
    assert!(err.to_string().contains("503"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_yields_no_prices() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    assert!(oracle(&server)?.fetch_prices(&symbols()).await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_short_result_yields_no_prices() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"symbol": "BTC", "px": "56871230000000", "request_id": "1830", "resolve_time": "1620000000"}
            ]
        })))
        .mount(&server)
        .await;

    assert!(oracle(&server)?.fetch_prices(&symbols()).await.is_none());
    Ok(())
}
