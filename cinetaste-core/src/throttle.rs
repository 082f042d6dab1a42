//! Request throttle for the external catalog API.
//!
//! Every outbound catalog call is funnelled through one [`RequestThrottle`].
//! Tasks run strictly one at a time in submission order, and the worker
//! waits `min_interval` after each task settles before starting the next.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Roughly four requests per second.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(250);

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThrottleError {
    #[error("request throttle has shut down")]
    Closed,

    #[error("throttled task aborted before producing a result")]
    TaskAborted,
}

/// FIFO, one-at-a-time executor with a fixed pause between tasks.
///
/// Cloning yields another handle onto the same queue. The worker stops once
/// every handle has been dropped and the queue has drained.
#[derive(Clone)]
pub struct RequestThrottle {
    submit_tx: mpsc::UnboundedSender<Job>,
    min_interval: Duration,
}

impl fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("min_interval", &self.min_interval)
            .finish_non_exhaustive()
    }
}

impl RequestThrottle {
    /// Spawn the queue worker. Must be called from within a Tokio runtime.
    pub fn new(min_interval: Duration) -> Self {
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_queue(submit_rx, min_interval));
        Self {
            submit_tx,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Queue `task` and return a future resolving to its output.
    ///
    /// The task is queued when `enqueue` is called, not when the returned
    /// future is first polled, so call order is execution order. Dropping
    /// the future does not cancel the task.
    pub fn enqueue<F, Fut, T>(
        &self,
        task: F,
    ) -> impl Future<Output = Result<T, ThrottleError>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            Box::pin(async move {
                let output = task().await;
                // The caller may have stopped waiting.
                let _ = result_tx.send(output);
            })
        });
        let submitted = self.submit_tx.send(job).map_err(|_| ThrottleError::Closed);

        async move {
            submitted?;
            result_rx.await.map_err(|_| ThrottleError::TaskAborted)
        }
    }
}

async fn run_queue(mut submit_rx: mpsc::UnboundedReceiver<Job>, min_interval: Duration) {
    debug!(interval_ms = min_interval.as_millis() as u64, "request throttle started");

    while let Some(job) = submit_rx.recv().await {
        // A panicking task only loses its own result sender.
        if let Err(err) = tokio::spawn(job()).await {
            warn!(error = %err, "throttled task panicked");
        }
        tokio::time::sleep(min_interval).await;
    }

    debug!("request throttle stopped");
}
