//! Deserializers for chain and oracle JSON, where integers are sent as
//! either JSON numbers or decimal strings depending on the node version.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Accept `42` and `"42"`
pub fn u64_from_str_or_num<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Same as `u64_from_str_or_num`, with a missing or null field read as zero
pub fn u64_from_str_or_num_default<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrString::Number(n)) => Ok(n),
        Some(NumberOrString::String(s)) if s.is_empty() => Ok(0),
        Some(NumberOrString::String(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Decimal price text. Quoted values pass through verbatim; bare JSON
/// numbers are parsed as `f64` first, so only about 17 significant digits
/// survive.
pub fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(serde_json::Number),
    }

    match Raw::deserialize(deserializer)? {
        Raw::String(s) => Ok(s),
        Raw::Number(n) => Ok(n.to_string()),
    }
}
