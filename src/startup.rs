//! Process wiring: builds the relay service from configuration and waits
//! for shutdown signals.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::services::{
    BandOracleClient, ConfirmationPoller, LcdClient, RelayService, TransactionSubmitter, WalletKey,
};

/// Derive the wallet and connect every collaborator of the relay loop
pub fn build_relay_service(config: &Config, show_progress: bool) -> Result<RelayService> {
    let wallet = Arc::new(WalletKey::from_config(&config.wallet_mnemonic, &config.chain)?);

    let timeout = config.relay.request_timeout();

    let lcd = Arc::new(LcdClient::new(&config.chain.lcd_url, timeout)?);
    info!(
        "LCD client initialized: {} (chain {})",
        lcd.url(),
        config.chain.chain_id
    );

    let oracle = Arc::new(BandOracleClient::new(&config.oracle, timeout)?);

    let submitter = Arc::new(TransactionSubmitter::new(
        lcd.clone(),
        wallet,
        config.chain.clone(),
    ));

    let poller = ConfirmationPoller::new(
        lcd.clone(),
        config.relay.poll_max_attempts,
        config.relay.poll_interval(),
    )
    .with_progress(show_progress);

    Ok(RelayService::new(config, oracle, submitter, lcd, poller))
}

/// Wait for SIGTERM or SIGINT signal for graceful shutdown
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::TEST_MNEMONIC;

    #[test]
    fn test_builds_service_from_defaults() {
        let config = Config::from_lookup(|key| {
            (key == "COSMWASM_DOC_SEED").then(|| TEST_MNEMONIC.to_string())
        })
        .unwrap();

        let service = build_relay_service(&config, false).unwrap();
        assert_eq!(service.symbols(), ["BTC", "ETH", "BAND"]);
    }
}
