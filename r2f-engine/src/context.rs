//! Per-call cancellation and deadline.

use crate::{ReconcileError, ReconcileResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline carried by every reconciliation call.
///
/// Each blocking step (enumerations, resource reads) is raced against the
/// token and the deadline; whichever fires first aborts the whole call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never cancels and never times out.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Replaces the deadline.
    #[must_use]
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the cancellation token, e.g. with a child of a server-wide token.
    #[must_use]
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the call was cancelled or its deadline has passed.
    pub fn check(&self, operation: &str) -> ReconcileResult<()> {
        if self.cancel.is_cancelled() {
            return Err(ReconcileError::Cancelled {
                operation: operation.to_string(),
            });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ReconcileError::DeadlineExceeded {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Runs `fut` unless the call is cancelled or times out first.
    pub async fn run<F>(&self, operation: &str, fut: F) -> ReconcileResult<F::Output>
    where
        F: Future,
    {
        self.check(operation)?;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ReconcileError::Cancelled {
                operation: operation.to_string(),
            }),
            _ = wait_for(self.deadline) => Err(ReconcileError::DeadlineExceeded {
                operation: operation.to_string(),
            }),
            output = fut => Ok(output),
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
