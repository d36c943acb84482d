use crate::{Result, RouletteError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Cooperative cancellation support for the search loop.
///
/// This is intentionally simple:
/// - `cancel()` flips a boolean and wakes sleepers.
/// - `reset()` clears the flag so future searches can run again.
/// - Retry sleeps select on either the timer or cancellation.
#[derive(Clone, Debug)]
pub struct CancellationState {
    tx: watch::Sender<bool>,
}

impl Default for CancellationState {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn reset(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Resolves once cancellation is requested. Never resolves if the
/// [`CancellationState`] is dropped without cancelling.
async fn cancelled(mut cancel_rx: watch::Receiver<bool>) {
    loop {
        if *cancel_rx.borrow_and_update() {
            return;
        }
        if cancel_rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleep for `duration` unless cancellation is requested first.
pub async fn sleep_with_cancel(cancel_rx: watch::Receiver<bool>, duration: Duration) -> Result<()> {
    run_with_cancel(cancel_rx, tokio::time::sleep(duration)).await
}

/// Drive `future` to completion unless cancellation is requested first.
pub async fn run_with_cancel<F>(cancel_rx: watch::Receiver<bool>, future: F) -> Result<F::Output>
where
    F: Future,
{
    if *cancel_rx.borrow() {
        return Err(RouletteError::Cancelled);
    }

    tokio::pin!(future);
    tokio::select! {
        output = &mut future => Ok(output),
        _ = cancelled(cancel_rx) => Err(RouletteError::Cancelled),
    }
}
