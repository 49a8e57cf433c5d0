use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, RelayError>;

/// Error codes for categorizing relay failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FetchFailure,
    SignOrBroadcastFailure,
    ConfirmationTimeout,
    ConfirmationRejected,
    QueryFailure,
    ConfigurationError,
    WalletError,
}

impl ErrorCode {
    /// Stable label, used as the metrics outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FetchFailure => "fetch_failure",
            ErrorCode::SignOrBroadcastFailure => "sign_or_broadcast_failure",
            ErrorCode::ConfirmationTimeout => "confirmation_timeout",
            ErrorCode::ConfirmationRejected => "confirmation_rejected",
            ErrorCode::QueryFailure => "query_failure",
            ErrorCode::ConfigurationError => "configuration_error",
            ErrorCode::WalletError => "wallet_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Fail to get prices from band: {0}")]
    FetchFailure(String),

    #[error("Fail to sign or broadcast tx: {0}")]
    SignOrBroadcast(String),

    #[error("Fail to get result from chain for tx {txhash} after {attempts} attempts")]
    ConfirmationTimeout { txhash: String, attempts: u32 },

    #[error("Fail to send tx with result: {result}")]
    ConfirmationRejected { code: u32, result: String },

    #[error("Fail to get current rates from std contract: {0}")]
    QueryFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl RelayError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            RelayError::FetchFailure(_) => ErrorCode::FetchFailure,
            RelayError::SignOrBroadcast(_) => ErrorCode::SignOrBroadcastFailure,
            RelayError::ConfirmationTimeout { .. } => ErrorCode::ConfirmationTimeout,
            RelayError::ConfirmationRejected { .. } => ErrorCode::ConfirmationRejected,
            RelayError::QueryFailure(_) => ErrorCode::QueryFailure,
            RelayError::Configuration(_) => ErrorCode::ConfigurationError,
            RelayError::Wallet(_) => ErrorCode::WalletError,
        }
    }

    /// Failures the next iteration is expected to clear without intervention.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RelayError::FetchFailure(_)
                | RelayError::ConfirmationTimeout { .. }
                | RelayError::QueryFailure(_)
        )
    }

    /// Log error with appropriate level
    pub fn log_error(&self, iteration_id: &str) {
        if self.is_transient() {
            warn!(
                iteration_id = %iteration_id,
                code = self.error_code().as_str(),
                error = %self,
                "Relay iteration aborted"
            );
        } else {
            error!(
                iteration_id = %iteration_id,
                code = self.error_code().as_str(),
                error = %self,
                "Relay iteration failed"
            );
        }
    }
}
