//! Relay constants and default configuration values.
//!
//! This module centralizes all hardcoded values and magic numbers
//! so the defaults used by `Config::from_env` live in one place.

/// Band oracle constants
pub mod oracle {
    /// Public price request endpoint
    pub const DEFAULT_URL: &str = "https://asia-rpc.bandchain.org/oracle/request_prices";

    /// Symbols relayed when `ORACLE_SYMBOLS` is not set
    pub const DEFAULT_SYMBOLS: &[&str] = &["BTC", "ETH", "BAND"];

    /// Minimum number of validator reports for a resolved request
    pub const MIN_COUNT: u32 = 10;

    /// Number of validators asked to report
    pub const ASK_COUNT: u32 = 16;
}

/// Terra chain constants
pub mod chain {
    // The tequila defaults are historical. That network served only the
    // legacy `/txs` routes with amino signing, while the client speaks
    // `/cosmos/tx/v1beta1` with SIGN_MODE_DIRECT, so a live deployment must
    // set `LCD_URL`, `CHAIN_ID` and `CONTRACT_ADDRESS` for an SDK 0.40+ chain.

    /// LCD endpoint of the (retired) tequila testnet
    pub const DEFAULT_LCD_URL: &str = "https://tequila-lcd.terra.dev";

    pub const DEFAULT_CHAIN_ID: &str = "tequila-0004";

    /// Standard reference contract the relay writes to
    pub const DEFAULT_CONTRACT_ADDRESS: &str = "terra1hurg8ze4tkdy00ppuy7feuse0y2uh0mc9vuwl9";

    /// Bech32 human readable part of Terra accounts
    pub const ACCOUNT_PREFIX: &str = "terra";

    /// BIP-44 path for Terra (coin type 330)
    pub const DERIVATION_PATH: &str = "m/44'/330'/0'/0/0";

    /// Environment variable holding the wallet mnemonic
    pub const MNEMONIC_ENV: &str = "COSMWASM_DOC_SEED";

    /// Gas limit for every relay transaction
    pub const GAS_LIMIT: u64 = 200_000;

    /// Fee per gas unit, in `FEE_DENOM`
    pub const GAS_PRICE: f64 = 0.15;

    pub const FEE_DENOM: &str = "uluna";

    pub const BROADCAST_MODE: &str = "BROADCAST_MODE_SYNC";
}

/// Relay loop constants
pub mod relay {
    /// Quote currency for every base symbol in the read-back query
    pub const QUOTE_SYMBOL: &str = "USD";

    /// Confirmation lookups before giving up on a transaction
    pub const POLL_MAX_ATTEMPTS: u32 = 30;

    pub const POLL_INTERVAL_MS: u64 = 1_000;

    /// Pause between two relay iterations
    pub const RELAY_INTERVAL_SECS: u64 = 10;

    /// HTTP request timeout for oracle and LCD calls
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Printed after every iteration regardless of outcome
    pub const SEPARATOR: &str =
        "=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=";
}
