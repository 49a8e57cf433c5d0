use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};

use super::signing::SigningManager;
use crate::config::ChainConfig;
use crate::error::Result;
use crate::models::relay::PriceRelayPayload;
use crate::services::blockchain::lcd::LcdClient;
use crate::services::blockchain::wallet::WalletKey;
use crate::services::traits::RelaySubmitter;

/// Signs relay transactions with the process wallet and hands them to the
/// LCD in sync broadcast mode.
#[derive(Clone)]
pub struct TransactionSubmitter {
    lcd: Arc<LcdClient>,
    wallet: Arc<WalletKey>,
    chain: ChainConfig,
}

impl TransactionSubmitter {
    pub fn new(lcd: Arc<LcdClient>, wallet: Arc<WalletKey>, chain: ChainConfig) -> Self {
        Self { lcd, wallet, chain }
    }
}

/// Tendermint transaction hash: uppercase hex SHA-256 of the raw bytes
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

#[async_trait]
impl RelaySubmitter for TransactionSubmitter {
    async fn submit(&self, payload: &PriceRelayPayload) -> Result<String> {
        let address = self.wallet.address().to_string();
        let account = self.lcd.account(&address).await?;

        let tx_bytes = SigningManager::sign_relay_tx(&self.wallet, &self.chain, &account, payload)?;
        let local_hash = tx_hash(&tx_bytes);

        let response = self.lcd.broadcast_sync(&tx_bytes).await?;
        metrics::counter!("relay_broadcasts_total").increment(1);

        let txhash = if response.txhash.is_empty() {
            local_hash
        } else {
            if !response.txhash.eq_ignore_ascii_case(&local_hash) {
                warn!(
                    "Node returned tx hash {} but signed bytes hash to {}",
                    response.txhash, local_hash
                );
            }
            response.txhash
        };

        info!("broadcast tx: {}", txhash);
        Ok(txhash)
    }
}
