// Band oracle price request/response models

use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{decimal_text, u64_from_str_or_num};

/// Body of the `request_prices` call
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PriceRequest<'a> {
    pub symbols: &'a [String],
    pub min_count: u32,
    pub ask_count: u32,
}

/// One resolved price in the oracle answer
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OraclePrice {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "decimal_text")]
    pub px: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub request_id: u64,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub resolve_time: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct PriceResult {
    result: Vec<OraclePrice>,
}

/// Oracle answer, either bare `{result}` or wrapped as `{data: {result}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PriceEnvelope {
    Wrapped { data: PriceResult },
    Bare(PriceResult),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "PriceEnvelope")]
pub struct PriceResponse {
    pub result: Vec<OraclePrice>,
}

impl From<PriceEnvelope> for PriceResponse {
    fn from(envelope: PriceEnvelope) -> Self {
        match envelope {
            PriceEnvelope::Wrapped { data } | PriceEnvelope::Bare(data) => PriceResponse {
                result: data.result,
            },
        }
    }
}
