use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::models::transaction::{TxConfirmation, TxLookup};
use crate::services::traits::ChainQuery;
use crate::utils::progress::PollProgress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Polling { remaining: u32 },
    Found(TxConfirmation),
    Exhausted,
}

/// Waits for a broadcast transaction to show up on chain
#[derive(Clone)]
pub struct ConfirmationPoller {
    chain: Arc<dyn ChainQuery>,
    max_attempts: u32,
    interval: Duration,
    show_progress: bool,
}

impl ConfirmationPoller {
    pub fn new(chain: Arc<dyn ChainQuery>, max_attempts: u32, interval: Duration) -> Self {
        Self {
            chain,
            max_attempts,
            interval,
            show_progress: false,
        }
    }

    /// Draw the `polling: N` counter on stdout while waiting
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sleep, then look the hash up, until it is found or the attempt
    /// budget runs out. Lookup errors never end the wait early.
    pub async fn wait_for(&self, txhash: &str) -> Option<TxConfirmation> {
        let mut progress = PollProgress::new(self.show_progress);
        let mut state = PollState::Polling {
            remaining: self.max_attempts,
        };

        loop {
            state = match state {
                PollState::Polling { remaining: 0 } => PollState::Exhausted,
                PollState::Polling { remaining } => {
                    tokio::time::sleep(self.interval).await;

                    let attempt = self.max_attempts - remaining + 1;
                    progress.update(attempt);

                    match self.chain.tx_info(txhash).await {
                        TxLookup::Found(confirmation) => PollState::Found(confirmation),
                        TxLookup::NotFound => {
                            debug!("Tx {} not found yet (attempt {})", txhash, attempt);
                            PollState::Polling {
                                remaining: remaining - 1,
                            }
                        }
                        TxLookup::TransportError {
                            status: Some(status),
                            message,
                        } => {
                            progress.finish();
                            warn!("Tx lookup for {} returned HTTP {}: {}", txhash, status, message);
                            PollState::Polling {
                                remaining: remaining - 1,
                            }
                        }
                        TxLookup::TransportError {
                            status: None,
                            message,
                        } => {
                            progress.finish();
                            error!("Tx lookup for {} failed: {}", txhash, message);
                            PollState::Polling {
                                remaining: remaining - 1,
                            }
                        }
                    }
                }
                PollState::Found(confirmation) => {
                    progress.finish();
                    info!(
                        "Tx {} included at height {} with code {}",
                        confirmation.txhash, confirmation.height, confirmation.code
                    );
                    return Some(confirmation);
                }
                PollState::Exhausted => {
                    progress.finish();
                    warn!(
                        "Tx {} not found after {} attempts",
                        txhash, self.max_attempts
                    );
                    return None;
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Answers lookups from a script, then `NotFound` forever
    struct ScriptedChain {
        script: Mutex<VecDeque<TxLookup>>,
        calls: AtomicU32,
    }

    impl ScriptedChain {
        fn new(script: Vec<TxLookup>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainQuery for ScriptedChain {
        async fn tx_info(&self, _txhash: &str) -> TxLookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(TxLookup::NotFound)
        }

        async fn query_contract(
            &self,
            _contract: &str,
            _query: &serde_json::Value,
        ) -> Result<serde_json::Value, RelayError> {
            unreachable!("poller never queries contracts")
        }
    }

    fn confirmation(code: u32) -> TxConfirmation {
        TxConfirmation {
            txhash: "ABC123".into(),
            height: 10,
            code,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_exactly_max_attempts() {
        let chain = ScriptedChain::new(vec![]);
        let poller = ConfirmationPoller::new(chain.clone(), 30, Duration::from_secs(1));

        let started = tokio::time::Instant::now();
        assert!(poller.wait_for("ABC123").await.is_none());

        assert_eq!(chain.calls(), 30);
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert!(started.elapsed() < Duration::from_secs(31));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_on_first_success() {
        let chain = ScriptedChain::new(vec![TxLookup::Found(confirmation(0))]);
        let poller = ConfirmationPoller::new(chain.clone(), 30, Duration::from_secs(1));

        let result = poller.wait_for("ABC123").await.unwrap();

        assert_eq!(result.code, 0);
        assert_eq!(chain.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_do_not_end_wait() {
        let chain = ScriptedChain::new(vec![
            TxLookup::TransportError {
                status: Some(500),
                message: "internal".into(),
            },
            TxLookup::NotFound,
            TxLookup::TransportError {
                status: None,
                message: "connection reset".into(),
            },
            TxLookup::Found(confirmation(5)),
        ]);
        let poller = ConfirmationPoller::new(chain.clone(), 30, Duration::from_secs(1));

        let result = poller.wait_for("ABC123").await.unwrap();

        assert_eq!(result.code, 5);
        assert_eq!(chain.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_count_against_budget() {
        let errors = (0..3)
            .map(|_| TxLookup::TransportError {
                status: Some(502),
                message: "bad gateway".into(),
            })
            .collect();
        let chain = ScriptedChain::new(errors);
        let poller = ConfirmationPoller::new(chain.clone(), 3, Duration::from_millis(10));

        assert!(poller.wait_for("ABC123").await.is_none());
        assert_eq!(chain.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_before_first_lookup() {
        let chain = ScriptedChain::new(vec![TxLookup::Found(confirmation(0))]);
        let poller = ConfirmationPoller::new(chain.clone(), 30, Duration::from_secs(1));

        let started = tokio::time::Instant::now();
        poller.wait_for("ABC123").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
