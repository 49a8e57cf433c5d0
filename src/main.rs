use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use price_relay::startup::{build_relay_service, shutdown_signal};
use price_relay::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "price_relay=info".into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: oracle={} lcd={} contract={}",
        config.oracle.url, config.chain.lcd_url, config.chain.contract_address
    );

    let relay = build_relay_service(&config, true)?;

    tokio::select! {
        _ = relay.run_forever() => {},
        _ = shutdown_signal() => {},
    }

    info!("Price relay stopped");
    Ok(())
}
