//! Bounded, panic-isolated execution of handler futures.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::HandlerError;
use crate::types::HandlerFuture;

/// Why a handler did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecFailure {
    /// The handler returned an error or panicked.
    Failed(String),
    /// The handler overran its bound and was aborted.
    TimedOut(Duration),
}

/// A registered handler: input in, boxed future out.
pub type BoxedHandler<I, T> = Arc<dyn Fn(I) -> HandlerFuture<T> + Send + Sync>;

/// Call `handler` with `input` on its own task, bounded by `timeout`.
///
/// The handler is called inside the task, so a panic while it builds its
/// future is contained just like a panic while the future runs. The task
/// is aborted on overrun so an abandoned handler does not keep running.
pub async fn run_bounded<I, T>(
    handler: BoxedHandler<I, T>,
    input: I,
    timeout: Duration,
) -> Result<T, ExecFailure>
where
    I: Send + 'static,
    T: Send + 'static,
{
    let started = Instant::now();
    let mut task = tokio::spawn(async move { handler(input).await });

    match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(HandlerError(message)))) => Err(ExecFailure::Failed(message)),
        Ok(Err(join_err)) => {
            if join_err.is_panic() {
                tracing::error!("Handler panicked: {join_err}");
                Err(ExecFailure::Failed("handler panicked".to_string()))
            } else {
                Err(ExecFailure::Failed("handler was cancelled".to_string()))
            }
        }
        Err(_) => {
            task.abort();
            Err(ExecFailure::TimedOut(started.elapsed()))
        }
    }
}
