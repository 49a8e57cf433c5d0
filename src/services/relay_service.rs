//! Relay Service
//!
//! Background loop that moves Band prices onto the reference contract:
//! fetch, submit, wait for inclusion, then read the stored rates back.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::constants::relay::SEPARATOR;
use crate::error::{RelayError, Result};
use crate::models::relay::{ContractRateSnapshot, ReferenceQueryMsg};
use crate::services::blockchain::transactions::ConfirmationPoller;
use crate::services::traits::{ChainQuery, PriceSource, RelaySubmitter};

/// Outcome of one successful iteration
#[derive(Debug, Clone)]
pub struct RelayReport {
    pub txhash: String,
    pub height: u64,
    pub rates: ContractRateSnapshot,
}

#[derive(Clone)]
pub struct RelayService {
    source: Arc<dyn PriceSource>,
    submitter: Arc<dyn RelaySubmitter>,
    chain: Arc<dyn ChainQuery>,
    poller: ConfirmationPoller,
    symbols: Vec<String>,
    contract_address: String,
    quote_symbol: String,
    relay_interval: Duration,
}

impl RelayService {
    pub fn new(
        config: &Config,
        source: Arc<dyn PriceSource>,
        submitter: Arc<dyn RelaySubmitter>,
        chain: Arc<dyn ChainQuery>,
        poller: ConfirmationPoller,
    ) -> Self {
        Self {
            source,
            submitter,
            chain,
            poller,
            symbols: config.oracle.symbols.clone(),
            contract_address: config.chain.contract_address.clone(),
            quote_symbol: config.relay.quote_symbol.clone(),
            relay_interval: config.relay.relay_interval(),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Run iterations until the task is dropped. No failure stops the loop.
    pub async fn run_forever(&self) {
        info!(
            "Starting price relay for {:?} every {}s",
            self.symbols,
            self.relay_interval.as_secs()
        );

        let mut iteration: u64 = 0;
        loop {
            iteration += 1;
            self.run_once(iteration).await;

            info!("{}", SEPARATOR);
            tokio::time::sleep(self.relay_interval).await;
        }
    }

    /// One instrumented iteration: logs the failure, if any, and counts
    /// the outcome.
    pub async fn run_once(&self, iteration: u64) -> Option<RelayReport> {
        let iteration_id = Uuid::new_v4().to_string();
        let span = info_span!("relay", iteration, iteration_id = %iteration_id);

        let result = self.run_iteration().instrument(span.clone()).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => {
                span.in_scope(|| e.log_error(&iteration_id));
                e.error_code().as_str()
            }
        };
        metrics::counter!("relay_iterations_total", "outcome" => outcome).increment(1);

        result.ok()
    }

    /// Fetch, submit, confirm, read back. The first failing step ends the
    /// iteration.
    pub async fn run_iteration(&self) -> Result<RelayReport> {
        let payload = self
            .source
            .fetch_prices(&self.symbols)
            .await
            .ok_or_else(|| RelayError::FetchFailure("no prices returned".to_string()))?;

        let message = serde_json::to_string(&payload).unwrap_or_default();
        info!("relay message: {}", message);

        let txhash = self.submitter.submit(&payload).await?;

        let confirmation = self.poller.wait_for(&txhash).await.ok_or_else(|| {
            RelayError::ConfirmationTimeout {
                txhash: txhash.clone(),
                attempts: self.poller.max_attempts(),
            }
        })?;

        if !confirmation.is_success() {
            let result = serde_json::to_string(&confirmation)
                .unwrap_or_else(|_| format!("{:?}", confirmation));
            return Err(RelayError::ConfirmationRejected {
                code: confirmation.code,
                result,
            });
        }
        info!("tx successfully send!");

        let rates = self
            .read_reference_rates()
            .await
            .ok_or_else(|| RelayError::QueryFailure("no rates returned".to_string()))?;
        info!("current rates: {}", render_rates(&rates));

        Ok(RelayReport {
            txhash,
            height: confirmation.height,
            rates,
        })
    }

    /// Bulk-query the contract for every relayed symbol against the quote
    /// symbol. Failures are logged and reported as `None`.
    pub async fn read_reference_rates(&self) -> Option<ContractRateSnapshot> {
        let query = ReferenceQueryMsg::bulk(&self.symbols, &self.quote_symbol);
        let query = match serde_json::to_value(&query) {
            Ok(query) => query,
            Err(e) => {
                error!("Failed to encode reference query: {}", e);
                return None;
            }
        };

        match self.chain.query_contract(&self.contract_address, &query).await {
            Ok(raw) => Some(ContractRateSnapshot {
                base_symbols: self.symbols.clone(),
                quote_symbol: self.quote_symbol.clone(),
                raw,
            }),
            Err(e) => {
                error!("Failed to query std contract: {}", e);
                None
            }
        }
    }
}

/// `BTC/USD=<rate>` pairs when the answer decodes, the raw JSON otherwise
fn render_rates(snapshot: &ContractRateSnapshot) -> String {
    match snapshot.reference_rates() {
        Some(rates) => rates
            .iter()
            .map(|(pair, data)| format!("{}={}", pair, data.rate))
            .collect::<Vec<_>>()
            .join(", "),
        None => snapshot.raw.to_string(),
    }
}
