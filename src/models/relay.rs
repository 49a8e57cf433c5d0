// Relay payload and the reference contract's execute/query messages

use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::u64_from_str_or_num;

/// Prices for one relay transaction. Entry `i` of every sequence describes
/// `symbols[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceRelayPayload {
    pub symbols: Vec<String>,
    pub rates: Vec<String>,
    pub resolve_times: Vec<u64>,
    pub request_ids: Vec<u64>,
}

impl PriceRelayPayload {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All four sequences have the same length
    pub fn is_aligned(&self) -> bool {
        let n = self.symbols.len();
        self.rates.len() == n && self.resolve_times.len() == n && self.request_ids.len() == n
    }
}

/// Execute message of the standard reference contract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceExecuteMsg {
    Relay(PriceRelayPayload),
}

/// Query messages of the standard reference contract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceQueryMsg {
    GetReferenceDataBulk {
        base_symbols: Vec<String>,
        quote_symbols: Vec<String>,
    },
}

impl ReferenceQueryMsg {
    /// Bulk query pairing every base symbol with the same quote symbol
    pub fn bulk(symbols: &[String], quote_symbol: &str) -> Self {
        ReferenceQueryMsg::GetReferenceDataBulk {
            base_symbols: symbols.to_vec(),
            quote_symbols: vec![quote_symbol.to_string(); symbols.len()],
        }
    }
}

/// Rate of one base/quote pair as stored by the reference contract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReferenceData {
    /// Uint128, multiplied by 1e18
    pub rate: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub last_updated_base: u64,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub last_updated_quote: u64,
}

/// Raw answer of the bulk reference query, with the pairs it was asked for
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRateSnapshot {
    pub base_symbols: Vec<String>,
    pub quote_symbol: String,
    pub raw: serde_json::Value,
}

impl ContractRateSnapshot {
    /// Decode the raw answer into `(pair, data)` entries. `None` if the
    /// contract answered with a shape other than one entry per pair.
    pub fn reference_rates(&self) -> Option<Vec<(String, ReferenceData)>> {
        let data: Vec<ReferenceData> = serde_json::from_value(self.raw.clone()).ok()?;
        if data.len() != self.base_symbols.len() {
            return None;
        }

        Some(
            self.base_symbols
                .iter()
                .map(|base| format!("{}/{}", base, self.quote_symbol))
                .zip(data)
                .collect(),
        )
    }
}
