// Wire models
// Band oracle DTOs, reference contract messages, LCD responses

pub mod oracle;
pub mod relay;
pub mod transaction;

pub use relay::{ContractRateSnapshot, PriceRelayPayload, ReferenceData};
pub use transaction::{TxConfirmation, TxLookup};
