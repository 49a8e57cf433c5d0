use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::chain::BROADCAST_MODE;
use crate::error::{RelayError, Result};
use crate::models::transaction::{
    AccountInfo, AccountResponse, BroadcastTxRequest, BroadcastTxResponse, GetTxResponse,
    SmartQueryResponse, TxConfirmation, TxLookup,
};
use crate::services::traits::ChainQuery;

/// REST client for a Cosmos SDK light client daemon
#[derive(Clone)]
pub struct LcdClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for LcdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LcdClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LcdClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        info!("Initializing LcdClient with URL: {}", base_url);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to build LCD client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Account number and current sequence of `address`
    pub async fn account(&self, address: &str) -> Result<AccountInfo> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{}", self.base_url, address);

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::SignOrBroadcast(format!("Account lookup failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RelayError::SignOrBroadcast(format!(
                "Account lookup for {} failed with status {}: {}",
                address, status, body
            )));
        }

        let parsed: AccountResponse = res
            .json()
            .await
            .map_err(|e| RelayError::SignOrBroadcast(format!("Invalid account response: {}", e)))?;

        debug!(
            "Account {} number={} sequence={}",
            address, parsed.account.account_number, parsed.account.sequence
        );
        Ok(parsed.account)
    }

    /// Broadcast signed tx bytes in sync mode. The returned record only
    /// carries the CheckTx result; a non-zero code is an error.
    pub async fn broadcast_sync(&self, tx_bytes: &[u8]) -> Result<TxConfirmation> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base_url);
        let body = BroadcastTxRequest {
            tx_bytes: general_purpose::STANDARD.encode(tx_bytes),
            mode: BROADCAST_MODE,
        };

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::SignOrBroadcast(format!("Broadcast request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(RelayError::SignOrBroadcast(format!(
                "Broadcast failed with status {}: {}",
                status, text
            )));
        }

        let parsed: BroadcastTxResponse = res
            .json()
            .await
            .map_err(|e| {
                RelayError::SignOrBroadcast(format!("Invalid broadcast response: {}", e))
            })?;

        if !parsed.tx_response.is_success() {
            return Err(RelayError::SignOrBroadcast(format!(
                "CheckTx rejected tx with code {} ({}): {}",
                parsed.tx_response.code, parsed.tx_response.codespace, parsed.tx_response.raw_log
            )));
        }

        Ok(parsed.tx_response)
    }

    async fn get_tx(&self, txhash: &str) -> TxLookup {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.base_url, txhash);

        let res = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                return TxLookup::TransportError {
                    status: None,
                    message: e.to_string(),
                }
            }
        };

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return TxLookup::NotFound;
        }

        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            // Older gateways answer an unknown hash with 400/500 and a
            // "tx not found" message instead of 404.
            if text.to_lowercase().contains("not found") {
                return TxLookup::NotFound;
            }
            return TxLookup::TransportError {
                status: Some(status.as_u16()),
                message: text,
            };
        }

        match res.json::<GetTxResponse>().await {
            Ok(parsed) => TxLookup::Found(parsed.tx_response),
            Err(e) => TxLookup::TransportError {
                status: None,
                message: format!("Invalid tx response: {}", e),
            },
        }
    }

    async fn smart_query(
        &self,
        contract: &str,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let encoded = general_purpose::URL_SAFE.encode(query.to_string());
        let url = format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.base_url, contract, encoded
        );

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::QueryFailure(format!("Contract query failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(RelayError::QueryFailure(format!(
                "Contract query failed with status {}: {}",
                status, text
            )));
        }

        let parsed: SmartQueryResponse = res
            .json()
            .await
            .map_err(|e| {
                RelayError::QueryFailure(format!("Invalid contract query response: {}", e))
            })?;

        Ok(parsed.data)
    }
}

#[async_trait]
impl ChainQuery for LcdClient {
    async fn tx_info(&self, txhash: &str) -> TxLookup {
        self.get_tx(txhash).await
    }

    async fn query_contract(
        &self,
        contract: &str,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.smart_query(contract, query).await
    }
}
