//! Band oracle price fetcher
//!
//! Requests resolved prices from Band's public `request_prices` endpoint
//! and projects them into the payload the reference contract expects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::OracleConfig;
use crate::error::{RelayError, Result};
use crate::models::oracle::{OraclePrice, PriceRequest, PriceResponse};
use crate::models::relay::PriceRelayPayload;
use crate::services::traits::PriceSource;

#[derive(Clone)]
pub struct BandOracleClient {
    client: Client,
    url: String,
    min_count: u32,
    ask_count: u32,
}

impl std::fmt::Debug for BandOracleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandOracleClient")
            .field("url", &self.url)
            .field("min_count", &self.min_count)
            .field("ask_count", &self.ask_count)
            .finish()
    }
}

impl BandOracleClient {
    pub fn new(config: &OracleConfig, timeout: Duration) -> Result<Self> {
        info!(
            "Initializing BandOracleClient with URL: {} (min_count={}, ask_count={})",
            config.url, config.min_count, config.ask_count
        );

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RelayError::Configuration(format!("Failed to build oracle client: {}", e))
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            min_count: config.min_count,
            ask_count: config.ask_count,
        })
    }

    /// One request, no retry. Every failure surfaces as `FetchFailure`.
    pub async fn request_prices(&self, symbols: &[String]) -> Result<PriceRelayPayload> {
        let body = PriceRequest {
            symbols,
            min_count: self.min_count,
            ask_count: self.ask_count,
        };

        let res = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::FetchFailure(format!("Request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(RelayError::FetchFailure(format!(
                "Oracle returned status {}: {}",
                status, text
            )));
        }

        let response: PriceResponse = res
            .json()
            .await
            .map_err(|e| RelayError::FetchFailure(format!("Invalid oracle response: {}", e)))?;

        debug!("Oracle returned {} prices", response.result.len());
        let payload = project_prices(symbols, response.result)?;

        for ((symbol, rate), resolve_time) in payload
            .symbols
            .iter()
            .zip(&payload.rates)
            .zip(&payload.resolve_times)
        {
            let resolved = i64::try_from(*resolve_time)
                .ok()
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
            match resolved {
                Some(at) => debug!("{} px={} resolved at {}", symbol, rate, at.to_rfc3339()),
                None => debug!("{} px={} resolve_time={}", symbol, rate, resolve_time),
            }
        }

        Ok(payload)
    }
}

/// Build the aligned payload, rejecting answers that do not line up with
/// the requested symbols
pub fn project_prices(symbols: &[String], prices: Vec<OraclePrice>) -> Result<PriceRelayPayload> {
    if prices.len() != symbols.len() {
        return Err(RelayError::FetchFailure(format!(
            "Expected {} prices, oracle returned {}",
            symbols.len(),
            prices.len()
        )));
    }

    let mut payload = PriceRelayPayload {
        symbols: symbols.to_vec(),
        rates: Vec::with_capacity(prices.len()),
        resolve_times: Vec::with_capacity(prices.len()),
        request_ids: Vec::with_capacity(prices.len()),
    };

    for (requested, price) in symbols.iter().zip(prices) {
        if let Some(symbol) = &price.symbol {
            if !symbol.eq_ignore_ascii_case(requested) {
                return Err(RelayError::FetchFailure(format!(
                    "Oracle answered {} where {} was requested",
                    symbol, requested
                )));
            }
        }

        let rate = Decimal::from_str(&price.px).map_err(|e| {
            RelayError::FetchFailure(format!("Invalid px '{}' for {}: {}", price.px, requested, e))
        })?;
        if rate.is_sign_negative() {
            return Err(RelayError::FetchFailure(format!(
                "Negative px '{}' for {}",
                price.px, requested
            )));
        }

        payload.rates.push(price.px);
        payload.resolve_times.push(price.resolve_time);
        payload.request_ids.push(price.request_id);
    }

    Ok(payload)
}

#[async_trait]
impl PriceSource for BandOracleClient {
    async fn fetch_prices(&self, symbols: &[String]) -> Option<PriceRelayPayload> {
        match self.request_prices(symbols).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!("Failed to fetch prices from band: {}", e);
                None
            }
        }
    }
}
