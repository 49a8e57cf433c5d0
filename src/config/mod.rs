use anyhow::{anyhow, Result};
use cosmrs::bip32::{Language, Mnemonic};
use cosmrs::AccountId;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{chain, oracle, relay};

#[derive(Debug, Clone)]
pub struct Config {
    pub oracle: OracleConfig,
    pub chain: ChainConfig,
    pub relay: RelayConfig,
    pub wallet_mnemonic: WalletMnemonic,
}

/// Band price endpoint and quorum settings
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub url: String,
    pub symbols: Vec<String>,
    pub min_count: u32,
    pub ask_count: u32,
}

/// Terra LCD endpoint, target contract and fee settings
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub lcd_url: String,
    pub chain_id: String,
    pub contract_address: String,
    pub account_prefix: String,
    pub derivation_path: String,
    pub gas_limit: u64,
    pub gas_price: f64,
    pub fee_denom: String,
}

impl ChainConfig {
    /// Fee amount paid for `gas_limit`, rounded up to a whole base unit
    pub fn fee_amount(&self) -> u128 {
        (self.gas_limit as f64 * self.gas_price).ceil() as u128
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub quote_symbol: String,
    pub poll_max_attempts: u32,
    pub poll_interval_ms: u64,
    pub relay_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl RelayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn relay_interval(&self) -> Duration {
        Duration::from_secs(self.relay_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Mnemonic phrase of the relay wallet, words joined by single spaces.
/// Never printed.
#[derive(Clone)]
pub struct WalletMnemonic(String);

impl WalletMnemonic {
    pub fn new(phrase: impl AsRef<str>) -> Self {
        Self(normalize_phrase(phrase.as_ref()))
    }

    pub fn phrase(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletMnemonic(<redacted>)")
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, applying defaults for
    /// everything except the wallet mnemonic.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let symbols = match lookup("ORACLE_SYMBOLS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => oracle::DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };

        let config = Config {
            oracle: OracleConfig {
                url: lookup("ORACLE_URL").unwrap_or_else(|| oracle::DEFAULT_URL.to_string()),
                symbols,
                min_count: parse_or(&lookup, "ORACLE_MIN_COUNT", oracle::MIN_COUNT)?,
                ask_count: parse_or(&lookup, "ORACLE_ASK_COUNT", oracle::ASK_COUNT)?,
            },
            chain: ChainConfig {
                lcd_url: lookup("LCD_URL").unwrap_or_else(|| chain::DEFAULT_LCD_URL.to_string()),
                chain_id: lookup("CHAIN_ID").unwrap_or_else(|| chain::DEFAULT_CHAIN_ID.to_string()),
                contract_address: lookup("CONTRACT_ADDRESS")
                    .unwrap_or_else(|| chain::DEFAULT_CONTRACT_ADDRESS.to_string()),
                account_prefix: chain::ACCOUNT_PREFIX.to_string(),
                derivation_path: chain::DERIVATION_PATH.to_string(),
                gas_limit: parse_or(&lookup, "GAS_LIMIT", chain::GAS_LIMIT)?,
                gas_price: parse_or(&lookup, "GAS_PRICE", chain::GAS_PRICE)?,
                fee_denom: lookup("FEE_DENOM").unwrap_or_else(|| chain::FEE_DENOM.to_string()),
            },
            relay: RelayConfig {
                quote_symbol: lookup("QUOTE_SYMBOL")
                    .unwrap_or_else(|| relay::QUOTE_SYMBOL.to_string()),
                poll_max_attempts: parse_or(
                    &lookup,
                    "POLL_MAX_ATTEMPTS",
                    relay::POLL_MAX_ATTEMPTS,
                )?,
                poll_interval_ms: parse_or(&lookup, "POLL_INTERVAL_MS", relay::POLL_INTERVAL_MS)?,
                relay_interval_secs: parse_or(
                    &lookup,
                    "RELAY_INTERVAL_SECS",
                    relay::RELAY_INTERVAL_SECS,
                )?,
                request_timeout_secs: parse_or(
                    &lookup,
                    "REQUEST_TIMEOUT_SECS",
                    relay::REQUEST_TIMEOUT_SECS,
                )?,
            },
            wallet_mnemonic: WalletMnemonic::new(lookup(chain::MNEMONIC_ENV).ok_or_else(|| {
                anyhow!("{} environment variable is required", chain::MNEMONIC_ENV)
            })?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the relay cannot run with, before any network call
    pub fn validate(&self) -> Result<()> {
        if self.oracle.symbols.is_empty() {
            return Err(anyhow!("ORACLE_SYMBOLS must name at least one symbol"));
        }
        if self.chain.gas_limit == 0 {
            return Err(anyhow!("GAS_LIMIT must be greater than zero"));
        }
        if !self.chain.gas_price.is_finite() || self.chain.gas_price < 0.0 {
            return Err(anyhow!("GAS_PRICE must be a non-negative number"));
        }
        if self.relay.poll_max_attempts == 0 {
            return Err(anyhow!("POLL_MAX_ATTEMPTS must be greater than zero"));
        }

        let contract = AccountId::from_str(&self.chain.contract_address)
            .map_err(|e| {
                anyhow!("Invalid CONTRACT_ADDRESS {}: {}", self.chain.contract_address, e)
            })?;
        if contract.prefix() != self.chain.account_prefix {
            return Err(anyhow!(
                "CONTRACT_ADDRESS must use the '{}' prefix, got '{}'",
                self.chain.account_prefix,
                contract.prefix()
            ));
        }

        let phrase = self.wallet_mnemonic.phrase();
        if phrase.is_empty() {
            return Err(anyhow!("{} must not be empty", chain::MNEMONIC_ENV));
        }
        // The error text of the bip39 parser may echo words, so it is dropped.
        Mnemonic::new(phrase, Language::English).map_err(|_| {
            anyhow!(
                "{} is not a valid 24-word BIP-39 mnemonic ({} words given)",
                chain::MNEMONIC_ENV,
                phrase.split_whitespace().count()
            )
        })?;

        Ok(())
    }
}

/// BIP-39 parsing splits on single spaces only
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon abandon abandon art";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("COSMWASM_DOC_SEED", TEST_MNEMONIC)]))
            .unwrap();

        assert_eq!(config.oracle.symbols, vec!["BTC", "ETH", "BAND"]);
        assert_eq!(config.oracle.min_count, 10);
        assert_eq!(config.oracle.ask_count, 16);
        assert_eq!(config.chain.chain_id, "tequila-0004");
        assert_eq!(config.chain.gas_limit, 200_000);
        assert_eq!(config.chain.fee_denom, "uluna");
        assert_eq!(config.relay.poll_max_attempts, 30);
        assert_eq!(config.relay.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.relay.relay_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_fee_is_fifteen_percent_of_gas() {
        let config = Config::from_lookup(lookup_from(&[("COSMWASM_DOC_SEED", TEST_MNEMONIC)]))
            .unwrap();
        assert_eq!(config.chain.fee_amount(), 30_000);
    }

    #[test]
    fn test_fee_rounds_up() {
        let config = Config::from_lookup(lookup_from(&[
            ("COSMWASM_DOC_SEED", TEST_MNEMONIC),
            ("GAS_LIMIT", "1001"),
        ]))
        .unwrap();
        // 1001 * 0.15 = 150.15
        assert_eq!(config.chain.fee_amount(), 151);
    }

    #[test]
    fn test_missing_mnemonic_rejected() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("COSMWASM_DOC_SEED"));
    }

    #[test]
    fn test_malformed_mnemonic_rejected() {
        let err = Config::from_lookup(lookup_from(&[(
            "COSMWASM_DOC_SEED",
            "correct horse battery staple",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("4 words given"));
        assert!(!err.to_string().contains("horse"));
    }

    #[test]
    fn test_mnemonic_whitespace_normalized() {
        let pasted = TEST_MNEMONIC.split(' ').collect::<Vec<_>>();
        let newline_separated = format!("{}\n", pasted.join("\n"));
        let double_spaced = format!("  {}\t", pasted.join("  "));

        for phrase in [newline_separated, double_spaced] {
            let config =
                Config::from_lookup(lookup_from(&[("COSMWASM_DOC_SEED", phrase.as_str())]))
                    .unwrap();
            assert_eq!(config.wallet_mnemonic.phrase(), TEST_MNEMONIC);
        }
    }

    #[test]
    fn test_symbols_parsed_and_normalized() {
        let config = Config::from_lookup(lookup_from(&[
            ("COSMWASM_DOC_SEED", TEST_MNEMONIC),
            ("ORACLE_SYMBOLS", "btc, eth ,,luna"),
        ]))
        .unwrap();
        assert_eq!(config.oracle.symbols, vec!["BTC", "ETH", "LUNA"]);
    }

    #[test]
    fn test_empty_symbols_rejected() {
        assert!(Config::from_lookup(lookup_from(&[
            ("COSMWASM_DOC_SEED", TEST_MNEMONIC),
            ("ORACLE_SYMBOLS", " , "),
        ]))
        .is_err());
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("COSMWASM_DOC_SEED", TEST_MNEMONIC),
            ("POLL_MAX_ATTEMPTS", "thirty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("POLL_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_malformed_contract_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("COSMWASM_DOC_SEED", TEST_MNEMONIC),
            ("CONTRACT_ADDRESS", "not-a-bech32-address"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CONTRACT_ADDRESS"));
    }

    #[test]
    fn test_mnemonic_not_in_debug_output() {
        let config = Config::from_lookup(lookup_from(&[("COSMWASM_DOC_SEED", TEST_MNEMONIC)]))
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("abandon"));
        assert!(debug.contains("redacted"));
    }
}
