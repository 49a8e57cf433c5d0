// Chain transaction and account models returned by the LCD

use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{u64_from_str_or_num, u64_from_str_or_num_default};

/// Result record of an included transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TxConfirmation {
    pub txhash: String,
    #[serde(default, deserialize_with = "u64_from_str_or_num_default")]
    pub height: u64,
    /// Zero when the transaction succeeded
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default, deserialize_with = "u64_from_str_or_num_default")]
    pub gas_wanted: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_num_default")]
    pub gas_used: u64,
    #[serde(default)]
    pub timestamp: String,
}

impl TxConfirmation {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// `GET /cosmos/tx/v1beta1/txs/{hash}` body
#[derive(Debug, Clone, Deserialize)]
pub struct GetTxResponse {
    pub tx_response: TxConfirmation,
}

/// `POST /cosmos/tx/v1beta1/txs` request body
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastTxRequest<'a> {
    pub tx_bytes: String,
    pub mode: &'a str,
}

/// `POST /cosmos/tx/v1beta1/txs` body. In sync mode only the CheckTx part
/// of the record is filled.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastTxResponse {
    pub tx_response: TxConfirmation,
}

/// Outcome of looking a transaction up by hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxLookup {
    /// The node does not know the hash yet
    NotFound,
    /// The lookup itself failed. `status` is set when the node answered
    /// with an HTTP error, unset for connection or decoding failures.
    TransportError {
        status: Option<u16>,
        message: String,
    },
    Found(TxConfirmation),
}

/// Account number and sequence needed to sign
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub account_number: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_num_default")]
    pub sequence: u64,
}

/// `GET /cosmos/auth/v1beta1/accounts/{address}` body
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub account: AccountInfo,
}

/// `GET /cosmwasm/wasm/v1/contract/{address}/smart/{query}` body
#[derive(Debug, Clone, Deserialize)]
pub struct SmartQueryResponse {
    pub data: serde_json::Value,
}
