//! Service trait abstractions for the relay collaborators.
//!
//! The relay loop only talks to the oracle and the chain through these
//! traits, so every step can be replaced by a fake in tests.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::models::relay::PriceRelayPayload;
use crate::models::transaction::TxLookup;

/// Source of signed prices
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch prices for `symbols`, in order. Failures are logged by the
    /// implementation and reported as `None`.
    async fn fetch_prices(&self, symbols: &[String]) -> Option<PriceRelayPayload>;
}

/// Builds, signs and broadcasts the relay transaction
#[async_trait]
pub trait RelaySubmitter: Send + Sync {
    /// Returns the transaction hash as soon as the node accepted the
    /// transaction into its mempool. Inclusion is not awaited.
    async fn submit(&self, payload: &PriceRelayPayload) -> Result<String, RelayError>;
}

/// Read-only chain access
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Look a transaction up by hash
    async fn tx_info(&self, txhash: &str) -> TxLookup;

    /// Smart-query a CosmWasm contract
    async fn query_contract(
        &self,
        contract: &str,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value, RelayError>;
}
