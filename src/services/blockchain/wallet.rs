use cosmrs::bip32::{DerivationPath, Language, Mnemonic, XPrv};
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;
use cosmrs::tx::{Raw, SignDoc};
use cosmrs::AccountId;
use std::fmt;
use tracing::info;

use crate::config::{normalize_phrase, ChainConfig, WalletMnemonic};
use crate::error::{RelayError, Result};

/// Relay signing key, derived once from the mnemonic at startup
pub struct WalletKey {
    signing_key: SigningKey,
    public_key: PublicKey,
    address: AccountId,
}

impl fmt::Debug for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKey")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}

impl WalletKey {
    pub fn from_config(mnemonic: &WalletMnemonic, chain: &ChainConfig) -> Result<Self> {
        Self::from_mnemonic(
            mnemonic.phrase(),
            &chain.derivation_path,
            &chain.account_prefix,
        )
    }

    pub fn from_mnemonic(phrase: &str, derivation_path: &str, prefix: &str) -> Result<Self> {
        let mnemonic = Mnemonic::new(normalize_phrase(phrase), Language::English)
            .map_err(|_| RelayError::Wallet("invalid BIP-39 mnemonic".to_string()))?;
        let path: DerivationPath = derivation_path
            .parse()
            .map_err(|e| {
                RelayError::Wallet(format!(
                    "invalid derivation path '{}': {}",
                    derivation_path, e
                ))
            })?;

        let seed = mnemonic.to_seed("");
        let xprv = XPrv::derive_from_path(seed.as_bytes(), &path)
            .map_err(|e| RelayError::Wallet(format!("key derivation failed: {}", e)))?;

        let signing_key = SigningKey::from_slice(&xprv.private_key().to_bytes())
            .map_err(|e| RelayError::Wallet(format!("invalid secp256k1 key: {}", e)))?;
        let public_key = signing_key.public_key();
        let address = public_key
            .account_id(prefix)
            .map_err(|e| {
                RelayError::Wallet(format!("invalid account prefix '{}': {}", prefix, e))
            })?;

        info!("Relay wallet loaded: {}", address);

        Ok(Self {
            signing_key,
            public_key,
            address,
        })
    }

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn sign(&self, sign_doc: SignDoc) -> Result<Raw> {
        sign_doc
            .sign(&self.signing_key)
            .map_err(|e| RelayError::SignOrBroadcast(format!("Failed to sign transaction: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::TEST_MNEMONIC;
    use crate::constants::chain::{ACCOUNT_PREFIX, DERIVATION_PATH};

    #[test]
    fn test_derivation_is_deterministic() {
        let a = WalletKey::from_mnemonic(TEST_MNEMONIC, DERIVATION_PATH, ACCOUNT_PREFIX).unwrap();
        let b = WalletKey::from_mnemonic(TEST_MNEMONIC, DERIVATION_PATH, ACCOUNT_PREFIX).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.public_key(), b.public_key());
        assert!(a.address().to_string().starts_with("terra1"));
    }

    #[test]
    fn test_pasted_phrase_derives_same_address() {
        let pasted = TEST_MNEMONIC.replace(' ', "\n");
        let a = WalletKey::from_mnemonic(&pasted, DERIVATION_PATH, ACCOUNT_PREFIX).unwrap();
        let b =
            WalletKey::from_mnemonic(TEST_MNEMONIC, DERIVATION_PATH, ACCOUNT_PREFIX).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_coin_type_changes_address() {
        let terra =
            WalletKey::from_mnemonic(TEST_MNEMONIC, DERIVATION_PATH, ACCOUNT_PREFIX).unwrap();
        let cosmos =
            WalletKey::from_mnemonic(TEST_MNEMONIC, "m/44'/118'/0'/0/0", ACCOUNT_PREFIX).unwrap();
        assert_ne!(terra.address(), cosmos.address());
    }

    #[test]
    fn test_invalid_mnemonic() {
        let err = WalletKey::from_mnemonic("not a mnemonic", DERIVATION_PATH, ACCOUNT_PREFIX)
            .unwrap_err();
        assert!(matches!(err, RelayError::Wallet(_)));
    }

    #[test]
    fn test_invalid_path() {
        let err = WalletKey::from_mnemonic(TEST_MNEMONIC, "44/330", ACCOUNT_PREFIX).unwrap_err();
        assert!(err.to_string().contains("derivation path"));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet =
            WalletKey::from_mnemonic(TEST_MNEMONIC, DERIVATION_PATH, ACCOUNT_PREFIX).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("terra1"));
        assert!(!debug.contains("signing_key"));
    }
}
