pub mod confirmation;
pub mod execution;
pub mod signing;

pub use confirmation::{ConfirmationPoller, PollState};
pub use execution::{tx_hash, TransactionSubmitter};
pub use signing::SigningManager;
