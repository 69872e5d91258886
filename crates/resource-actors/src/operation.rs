//! # Long-Running Operations
//!
//! Control-plane mutations (creating a network, deleting a resource group, …) are accepted
//! immediately and finish later. An [`Operation`] is the completion handle for such a
//! mutation: it can be polled with [`Operation::status`] or awaited with [`Operation::wait`].
//!
//! The work runs on its own task. Dropping the handle detaches from the work but does not
//! cancel it, the same way a provider keeps deleting a resource group after the caller
//! disconnects.

use crate::error::FrameworkError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// How long the issuing call blocks before handing back the [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// Return as soon as the provider accepted the request.
    Started,
    /// Return only after the operation reached a terminal state.
    Completed,
}

/// Observable state of a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    InProgress,
    Succeeded,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OperationStatus::InProgress)
    }
}

/// Completion handle for a long-running operation producing `T` or failing with `E`.
#[derive(Debug)]
pub struct Operation<T, E> {
    id: String,
    status: watch::Receiver<OperationStatus>,
    handle: JoinHandle<Result<T, E>>,
}

impl<T, E> Operation<T, E>
where
    T: Send + 'static,
    E: From<FrameworkError> + Send + 'static,
{
    /// Starts `work` on its own task after `latency` has elapsed.
    pub fn spawn<F>(latency: Duration, work: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let id = Uuid::new_v4().to_string();
        let (status_tx, status) = watch::channel(OperationStatus::InProgress);
        let op_id = id.clone();
        let handle = tokio::spawn(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let result = work.await;
            let terminal = if result.is_ok() {
                OperationStatus::Succeeded
            } else {
                OperationStatus::Failed
            };
            debug!(operation_id = %op_id, status = ?terminal, "Operation finished");
            let _ = status_tx.send(terminal);
            result
        });
        Self { id, status, handle }
    }

    /// Starts `work` and, for [`WaitUntil::Completed`], blocks until it is terminal.
    pub async fn start<F>(wait_until: WaitUntil, latency: Duration, work: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut operation = Self::spawn(latency, work);
        if wait_until == WaitUntil::Completed {
            operation.settle().await;
        }
        operation
    }

    async fn settle(&mut self) {
        // The sender only disappears without a terminal status if the task panicked;
        // `wait` reports that case.
        let _ = self.status.wait_for(|s| s.is_terminal()).await;
    }

    /// Provider-assigned identifier of this operation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current status without blocking.
    pub fn status(&self) -> OperationStatus {
        *self.status.borrow()
    }

    /// Awaits the terminal state and returns the operation's result.
    pub async fn wait(self) -> Result<T, E> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(operation_id = %self.id, error = %e, "Operation task did not complete");
                Err(E::from(FrameworkError::OperationAbandoned(self.id)))
            }
        }
    }
}
