//! Chain services: LCD access, wallet key and the relay transaction pipeline

pub mod lcd;
pub mod transactions;
pub mod wallet;

// Re-exports
pub use lcd::LcdClient;
pub use transactions::{ConfirmationPoller, PollState, SigningManager, TransactionSubmitter};
pub use wallet::WalletKey;
