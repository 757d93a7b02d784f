//! Cancelable in-flight requests.

use crate::{ApiError, RequestDescriptor, Result};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::{AbortHandle, JoinHandle};

/// Lifecycle of a request. The first terminal state reached is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Still in flight.
    Pending,
    /// Completed with a result.
    Resolved,
    /// Completed with an error.
    Rejected,
    /// Canceled by the caller before completing.
    Canceled,
}

impl RequestState {
    /// Check if the request can no longer change state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Cancels one request. Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    abort: AbortHandle,
    state: Arc<Mutex<RequestState>>,
}

impl CancelHandle {
    /// Abort the exchange. Returns `false` if the request had already
    /// settled, in which case its outcome stands.
    pub fn cancel(&self) -> bool {
        {
            let mut state = self.state.lock();
            if *state != RequestState::Pending {
                return false;
            }
            *state = RequestState::Canceled;
        }
        self.abort.abort();
        tracing::debug!("API request canceled");
        true
    }

    /// Check if this request was canceled.
    pub fn is_canceled(&self) -> bool {
        *self.state.lock() == RequestState::Canceled
    }
}

/// A request in flight.
///
/// Await it for the typed result. While it is pending, [`descriptor`](Self::descriptor)
/// exposes what was sent and [`cancel`](Self::cancel) aborts the exchange.
/// A canceled request never settles: awaiting it stays pending for good and
/// [`state`](Self::state) reports [`RequestState::Canceled`]. Race it against a
/// timeout or select on it if the awaiting side must move on. Dropping the
/// handle does not abort the exchange.
#[must_use = "a pending request does nothing useful unless awaited or canceled"]
pub struct PendingRequest<T> {
    descriptor: Arc<RequestDescriptor>,
    state: Arc<Mutex<RequestState>>,
    task: JoinHandle<Result<T>>,
    cancel: CancelHandle,
}

impl<T: Send + 'static> PendingRequest<T> {
    /// Run an exchange on the current tokio runtime.
    pub(crate) fn spawn<F>(descriptor: RequestDescriptor, exchange: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let state = Arc::new(Mutex::new(RequestState::Pending));
        let settled = state.clone();

        let task = tokio::spawn(async move {
            let result = exchange.await;
            {
                let mut state = settled.lock();
                if *state == RequestState::Pending {
                    *state = if result.is_ok() {
                        RequestState::Resolved
                    } else {
                        RequestState::Rejected
                    };
                }
            }
            result
        });

        let cancel = CancelHandle {
            abort: task.abort_handle(),
            state: state.clone(),
        };

        Self {
            descriptor: Arc::new(descriptor),
            state,
            task,
            cancel,
        }
    }

    /// A request that failed before it could be sent.
    pub(crate) fn rejected(descriptor: RequestDescriptor, error: ApiError) -> Self {
        Self::spawn(descriptor, async move { Err(error) })
    }
}

impl<T> PendingRequest<T> {
    /// Get the request as issued.
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> RequestState {
        *self.state.lock()
    }

    /// Abort the exchange. See [`CancelHandle::cancel`].
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    /// Get a handle that can cancel this request from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl<T> Future for PendingRequest<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Canceled is terminal and never settles, so no waker is kept.
        if *self.state.lock() == RequestState::Canceled {
            return Poll::Pending;
        }

        let joined = futures::ready!(Pin::new(&mut self.task).poll(cx));

        if *self.state.lock() == RequestState::Canceled {
            return Poll::Pending;
        }

        match joined {
            Ok(result) => Poll::Ready(result),
            Err(e) if e.is_cancelled() => Poll::Pending,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

impl<T> std::fmt::Debug for PendingRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state())
            .finish()
    }
}
