//! # Confirmation Waiter
//!
//! Polls a [`ReceiptSource`] until the transaction is mined, bounded by a
//! timeout. An optional shutdown channel cancels the wait; cancellation is
//! reported as [`LedgerError::Interrupted`].

use crate::domain::entities::ConfirmedTransaction;
use crate::domain::value_objects::TxHandle;
use crate::errors::LedgerError;
use crate::ports::outbound::{ConfirmationWaiter, ReceiptSource};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Bounded poll loop over a receipt source.
pub struct PollingConfirmationWaiter<R: ReceiptSource> {
    source: Arc<R>,
    poll_interval: Duration,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<R: ReceiptSource> PollingConfirmationWaiter<R> {
    /// Poll `source` every `poll_interval`.
    pub fn new(source: Arc<R>, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
            shutdown: None,
        }
    }

    /// Abort waits once `true` is published on `shutdown`.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    async fn poll_until_mined(
        &self,
        handle: &TxHandle,
    ) -> Result<ConfirmedTransaction, LedgerError> {
        let mut polls: u64 = 0;
        loop {
            if let Some(confirmed) = self.source.receipt(handle).await? {
                debug!(tx = %handle, polls, block = confirmed.block_number, "Transaction mined");
                return Ok(confirmed);
            }
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Resolves once shutdown is signalled. Never resolves if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl<R: ReceiptSource> ConfirmationWaiter for PollingConfirmationWaiter<R> {
    async fn wait_for(
        &self,
        handle: &TxHandle,
        timeout: Duration,
    ) -> Result<ConfirmedTransaction, LedgerError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let bounded = tokio::time::timeout(timeout, self.poll_until_mined(handle));

        let outcome = match self.shutdown.clone() {
            Some(mut shutdown) => {
                tokio::select! {
                    result = bounded => result,
                    () = shutdown_requested(&mut shutdown) => return Err(LedgerError::Interrupted),
                }
            }
            None => bounded.await,
        };

        outcome.map_err(|_| LedgerError::Timeout { timeout_ms })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ledger::InMemoryLedger;
    use crate::ports::outbound::LedgerExecutor;

    fn waiter(ledger: &Arc<InMemoryLedger>) -> PollingConfirmationWaiter<InMemoryLedger> {
        PollingConfirmationWaiter::new(Arc::clone(ledger), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_already_mined() {
        let ledger = Arc::new(InMemoryLedger::new());
        let handle = ledger.create("code").await.unwrap();

        let confirmed = waiter(&ledger)
            .wait_for(&handle, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(confirmed.contract_address.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mined_while_waiting() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_manual_mining(true);
        let handle = ledger.create("code").await.unwrap();

        let miner = Arc::clone(&ledger);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            miner.mine_pending();
        });

        let confirmed = waiter(&ledger)
            .wait_for(&handle, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(confirmed.handle, handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_manual_mining(true);
        let handle = ledger.create("code").await.unwrap();

        let result = waiter(&ledger)
            .wait_for(&handle, Duration::from_millis(500))
            .await;
        assert_eq!(result, Err(LedgerError::Timeout { timeout_ms: 500 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_wait() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_manual_mining(true);
        let handle = ledger.create("code").await.unwrap();

        let (tx, rx) = watch::channel(false);
        let waiter = waiter(&ledger).with_shutdown(rx);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(true);
        });

        let result = waiter.wait_for(&handle, Duration::from_secs(60)).await;
        assert_eq!(result, Err(LedgerError::Interrupted));
    }

    #[tokio::test]
    async fn test_unknown_handle_propagates() {
        let ledger = Arc::new(InMemoryLedger::new());
        let result = waiter(&ledger)
            .wait_for(&TxHandle::new("0xmissing"), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(LedgerError::UnknownTransaction(_))));
    }
}
