//! Cooperative cancellation helpers for pipeline steps.

use std::future::Future;

use tokio::sync::watch;

use crate::error::{WorkerError, WorkerResult};

/// Fail fast when the signal has already flipped.
pub(crate) fn ensure_active(cancel: &watch::Receiver<bool>) -> WorkerResult<()> {
    if *cancel.borrow() {
        return Err(WorkerError::Cancelled);
    }
    Ok(())
}

/// Run a fallible step, abandoning it when the signal flips mid-flight.
pub(crate) async fn with_cancel<T, E, F>(cancel: &watch::Receiver<bool>, fut: F) -> WorkerResult<T>
where
    F: Future<Output = Result<T, E>>,
    WorkerError: From<E>,
{
    let mut cancel = cancel.clone();
    tokio::pin!(fut);
    loop {
        tokio::select! {
            result = &mut fut => return Ok(result?),
            changed = cancel.changed() => {
                if changed.is_err() {
                    // Sender gone; nobody can cancel any more.
                    return Ok(fut.await?);
                }
                if *cancel.borrow() {
                    return Err(WorkerError::Cancelled);
                }
            }
        }
    }
}
