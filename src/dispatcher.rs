//! Cancellable dispatch of one network exchange.
//!
//! The exchange runs on its own tokio task and hands its outcome back through
//! one of two single-use channels, one for a response and one for a transport
//! failure. The caller races those against its [`CallContext`]. When the context
//! wins, the task is left to finish on its own: its send fails because the
//! receiver is gone, and the response it read is dropped with it.

use crate::errors::{CancelReason, LookupError, TransportError};
use crate::transport::{Transport, TransportResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation signal and optional deadline for a lookup.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never fires unless cancelled through [`cancel`](Self::cancel).
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the context to an existing token, e.g. a shutdown token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets a deadline `timeout` from now, keeping an earlier one if present.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Why the context has already fired, if it has.
    pub fn err(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            Some(CancelReason::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(CancelReason::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => CancelReason::Cancelled,
                _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancelReason::Cancelled
            }
        }
    }
}

/// An encoded request ready to be sent.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Runs the exchange and returns whichever comes first: the response, a
/// transport failure, or the context firing.
pub async fn dispatch(
    transport: Arc<dyn Transport>,
    request: OutboundRequest,
    ctx: &CallContext,
) -> Result<TransportResponse, LookupError> {
    if let Some(reason) = ctx.err() {
        return Err(LookupError::Cancelled(reason));
    }

    let (ok_tx, ok_rx) = oneshot::channel::<TransportResponse>();
    let (err_tx, err_rx) = oneshot::channel::<TransportError>();

    let handle = tokio::spawn(async move {
        let OutboundRequest {
            url,
            content_type,
            body,
        } = request;

        match transport.exchange(&url, content_type, body).await {
            Ok(response) => {
                if ok_tx.send(response).is_err() {
                    tracing::debug!("Discarding response from {}: caller stopped waiting", url);
                }
            }
            Err(e) => {
                if err_tx.send(e).is_err() {
                    tracing::debug!("Discarding transport failure from {}: caller stopped waiting", url);
                }
            }
        }
    });

    tokio::select! {
        biased;

        Ok(e) = err_rx => {
            tracing::error!("Transport failure: {}", e);
            Err(LookupError::Transport(e))
        }
        reason = ctx.done() => {
            tracing::warn!("Lookup abandoned: {}", reason);
            Err(LookupError::Cancelled(reason))
        }
        Ok(response) = ok_rx => Ok(response),
        // Only reachable when the task ended without reporting (panic)
        joined = handle => {
            let detail = match joined {
                Err(e) => format!("exchange task failed: {}", e),
                Ok(()) => "exchange task ended without a result".to_string(),
            };
            tracing::error!("{}", detail);
            Err(LookupError::Transport(TransportError(detail)))
        }
    }
}
