// Relay services
// Band oracle client, chain access and the relay loop

pub mod blockchain;
pub mod oracle_service;
pub mod relay_service;
pub mod traits;

pub use blockchain::{ConfirmationPoller, LcdClient, TransactionSubmitter, WalletKey};
pub use oracle_service::BandOracleClient;
pub use relay_service::{RelayReport, RelayService};
pub use traits::{ChainQuery, PriceSource, RelaySubmitter};
